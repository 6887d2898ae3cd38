/// Outcome of `CreateTraceWithStatus`, mirrored by `TraceStatus` in
/// `include/ethtrace.h`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStatus {
    Ok = 0,
    /// Null config pointer or a payload that is not UTF-8.
    InvalidInput = 1,
    Decode = 2,
    /// The tracer returned an error or panicked.
    Trace = 3,
    Encode = 4,
    /// The out pointer was null. Nothing was allocated.
    NullOutput = 5,
}
