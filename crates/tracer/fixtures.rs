//! Fixed configurations used by the `ethtrace` self-test and by tests.
//! Nothing on the production trace path reads from here.

/// Chain `0x53a`, two funded accounts and a single zero-value call from
/// `0x…cafe222` into `0x…cafe111`. The callee's code starts with `0x00`, so
/// the EVM executes a lone `STOP`.
pub const SELF_TEST_CONFIG: &str = include_str!("fixtures/self_test.json");
