use scorm_core::ScormVersion;

/// A SCORM runtime API as the embedded package sees it.
///
/// Every argument and return value is a string, per the SCORM binding. The
/// return value is always a syntactically valid SCORM response, so nothing a
/// package does can fail across this boundary.
pub trait ScormRuntime: Send + Sync {
    fn version(&self) -> ScormVersion;

    /// Dispatch a call by its SCORM method name.
    ///
    /// Missing arguments read as `""`. Unknown methods answer `"false"`.
    fn invoke(&self, method: &str, args: &[&str]) -> String;
}

/// Positional argument, or `""` when the package omitted it.
pub(crate) fn arg<'a>(args: &[&'a str], index: usize) -> &'a str {
    args.get(index).copied().unwrap_or("")
}
