/*! Integration tests for attrmap.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - mapping: Tests for Mapping construction, key/attribute access, combining and rendering
 * - frozen: Tests for FrozenMapping hashing and read-only guards
 * - merge: Tests for the merge free function
 * - named: Tests for Schema and NamedMapping records
 * - persistence: Tests for Reduced payloads and serde round-trips
 * - value: Tests for Value comparisons and conversions
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("attrmap=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod frozen;
mod helpers;
mod named;
mod persistence;
