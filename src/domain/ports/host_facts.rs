//! HostFacts port - read-only facts about the machine being bootstrapped

/// Read-only view of the host environment
///
/// Implementations:
/// - `SystemHost` - real environment, `PATH` lookup and `/proc`
/// - fakes in tests
pub trait HostFacts {
    /// `std::env::consts::OS` of the running binary
    fn os(&self) -> &str;

    /// Environment variable, `None` if unset or not unicode
    fn env(&self, key: &str) -> Option<String>;

    /// True if `program` resolves on `PATH`
    fn has_program(&self, program: &str) -> bool;

    /// Contents of `/etc/os-release`
    fn os_release(&self) -> std::io::Result<String>;

    /// Effective uid of this process, if it can be determined
    fn effective_uid(&self) -> Option<u32>;
}
