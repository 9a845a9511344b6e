// src/engine/status.rs
//
// Backend status codes and their display strings.
//
// Codes follow the layout of the Intel IPP status space that accelerated
// resize libraries report (small negative errors, small positive warnings),
// plus the library's own codes starting at -100001 so they never overlap.

use std::borrow::Cow;

/// Capacity of the diagnostic message a backend may attach to a failure.
pub const ERROR_MESSAGE_CAPACITY: usize = 1024;

/// Raw status returned by a resampling backend. Zero is success, negative
/// values are errors, positive values are warnings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusCode(pub i32);

impl StatusCode {
    pub const NO_ERR: StatusCode = StatusCode(0);
    pub const NO_OPERATION: StatusCode = StatusCode(1);
    pub const NO_ANTIALIASING: StatusCode = StatusCode(46);
    pub const SIZE_WRN: StatusCode = StatusCode(48);
    pub const SIZE_ERR: StatusCode = StatusCode(-6);
    pub const NULL_PTR_ERR: StatusCode = StatusCode(-8);
    pub const MEM_ALLOC_ERR: StatusCode = StatusCode(-9);
    pub const OUT_OF_RANGE_ERR: StatusCode = StatusCode(-11);
    pub const CONTEXT_MATCH_ERR: StatusCode = StatusCode(-13);
    pub const NOT_SUPPORTED_MODE_ERR: StatusCode = StatusCode(-14);
    pub const STEP_ERR: StatusCode = StatusCode(-16);
    pub const BORDER_ERR: StatusCode = StatusCode(-225);
    pub const EXCEEDED_SIZE_ERR: StatusCode = StatusCode(-232);

    pub const MEMORY_ALLOCATION_FAILED: StatusCode = StatusCode(-100001);
    pub const INVALID_NUMBER_CHANNELS: StatusCode = StatusCode(-100002);
    pub const OUT_IMAGE_UNALLOCATED: StatusCode = StatusCode(-100003);
    pub const INVALID_INTERPOLATION: StatusCode = StatusCode(-100004);

    pub fn is_success(&self) -> bool {
        self.0 == 0
    }

    pub fn is_warning(&self) -> bool {
        self.0 > 0
    }

    fn lookup(&self) -> Option<&'static (i32, &'static str, &'static str)> {
        STATUS_TABLE
            .binary_search_by_key(&self.0, |entry| entry.0)
            .ok()
            .map(|index| &STATUS_TABLE[index])
    }

    /// Symbolic name, or `StatusCode(<n>)` for codes outside the table.
    pub fn name(&self) -> Cow<'static, str> {
        match self.lookup() {
            Some(&(_, name, _)) => Cow::Borrowed(name),
            None => Cow::Owned(format!("StatusCode({})", self.0)),
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> Cow<'static, str> {
        match self.lookup() {
            Some(&(_, _, text)) => Cow::Borrowed(text),
            None => Cow::Owned(format!("Unknown status code {}", self.0)),
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.0)
    }
}

// Sorted by code for binary search.
static STATUS_TABLE: [(i32, &str, &str); 19] = [
    (-100004, "ImageErrInvalidInterpolation", "Invalid interpolation"),
    (-100003, "ImageErrOutImageUnallocated", "Output image is unallocated"),
    (-100002, "ImageErrInvalidNumberChannels", "Invalid number of image channels"),
    (-100001, "ImageErrMemoryAllocationFailed", "Memory allocation failed"),
    (-232, "StsExceededSizeErr", "Requested size exceeds the supported limit"),
    (-225, "StsBorderErr", "Illegal value for border type"),
    (-53, "StsNumChannelsErr", "Bad or unsupported number of channels"),
    (-23, "StsInterpolationErr", "Invalid interpolation mode"),
    (-16, "StsStepErr", "Step value is not valid"),
    (-14, "StsNotSupportedModeErr", "The requested mode is currently not supported"),
    (-13, "StsContextMatchErr", "Context parameter does not match the operation"),
    (-11, "StsOutOfRangeErr", "Argument is out of range"),
    (-9, "StsMemAllocErr", "Not enough memory for the operation"),
    (-8, "StsNullPtrErr", "Null pointer error"),
    (-6, "StsSizeErr", "Incorrect value for data size"),
    (0, "StsNoErr", "No errors"),
    (1, "StsNoOperation", "No operation has been executed"),
    (46, "StsNoAntialiasing", "The mode does not support antialiasing"),
    (48, "StsSizeWrn", "The size of the result is truncated"),
];

/// Format a backend diagnostic as `"{context}: {description} ({code})"`,
/// truncated to `ERROR_MESSAGE_CAPACITY` bytes on a char boundary.
pub fn format_diagnostic(code: StatusCode, context: &str) -> String {
    let mut message = format!("{context}: {} ({})", code.description(), code.0);
    if message.len() > ERROR_MESSAGE_CAPACITY - 1 {
        let mut end = ERROR_MESSAGE_CAPACITY - 1;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        message.truncate(end);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        assert!(STATUS_TABLE.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn known_codes_have_names() {
        assert_eq!(StatusCode::SIZE_ERR.name(), "StsSizeErr");
        assert_eq!(StatusCode::EXCEEDED_SIZE_ERR.name(), "StsExceededSizeErr");
        assert_eq!(StatusCode::SIZE_WRN.name(), "StsSizeWrn");
        assert_eq!(
            StatusCode::INVALID_NUMBER_CHANNELS.description(),
            "Invalid number of image channels"
        );
    }

    #[test]
    fn unknown_codes_fall_back() {
        assert_eq!(StatusCode(-7).name(), "StatusCode(-7)");
        assert_eq!(StatusCode(-7).to_string(), "StatusCode(-7) (-7)");
    }

    #[test]
    fn success_and_warning_classification() {
        assert!(StatusCode::NO_ERR.is_success());
        assert!(StatusCode::NO_ANTIALIASING.is_warning());
        assert!(!StatusCode::STEP_ERR.is_warning());
    }

    #[test]
    fn diagnostic_format_and_truncation() {
        let message = format_diagnostic(StatusCode::SIZE_ERR, "resize() failed");
        assert_eq!(message, "resize() failed: Incorrect value for data size (-6)");

        let long = "x".repeat(4096);
        let message = format_diagnostic(StatusCode::SIZE_ERR, &long);
        assert_eq!(message.len(), ERROR_MESSAGE_CAPACITY - 1);
    }
}
