// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use core::fmt;
use lumicam_sys as sys;

/// Vendor status code.
///
/// Every native call reports its outcome through one of a small closed set
/// of signed 32-bit codes; this code, not a panic or a rich error type, is
/// the primary error channel of the SDK and it is surfaced verbatim.
/// Negative values are failures, `S_OK`/`S_FALSE` are successes (`S_FALSE`
/// meaning the call was a no-op, e.g. the value was already set).
#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct HResult(pub i32);

impl HResult {
    pub const OK: HResult = HResult(sys::S_OK);
    pub const FALSE: HResult = HResult(sys::S_FALSE);
    pub const UNEXPECTED: HResult = HResult(sys::E_UNEXPECTED);
    pub const NOTIMPL: HResult = HResult(sys::E_NOTIMPL);
    pub const ACCESSDENIED: HResult = HResult(sys::E_ACCESSDENIED);
    pub const OUTOFMEMORY: HResult = HResult(sys::E_OUTOFMEMORY);
    pub const INVALIDARG: HResult = HResult(sys::E_INVALIDARG);
    pub const POINTER: HResult = HResult(sys::E_POINTER);
    pub const FAIL: HResult = HResult(sys::E_FAIL);
    pub const WRONG_THREAD: HResult = HResult(sys::E_WRONG_THREAD);
    pub const GEN_FAILURE: HResult = HResult(sys::E_GEN_FAILURE);
    pub const BUSY: HResult = HResult(sys::E_BUSY);
    pub const PENDING: HResult = HResult(sys::E_PENDING);
    pub const TIMEOUT: HResult = HResult(sys::E_TIMEOUT);

    /// Uniform status for operations invoked on a closed or invalidated
    /// session.  The vendor uses this code for "preconditions not met", so
    /// the closed status set is preserved rather than extended.
    pub const INOPERATIVE: HResult = HResult::UNEXPECTED;

    pub fn succeeded(self) -> bool {
        self.0 >= 0
    }

    pub fn failed(self) -> bool {
        self.0 < 0
    }

    /// Convert a raw native return code into a `Result`, keeping the
    /// success code (callers occasionally care about `S_FALSE`).
    pub(crate) fn check(code: i32) -> Result<HResult, HResult> {
        let hr = HResult(code);
        if hr.succeeded() {
            Ok(hr)
        } else {
            Err(hr)
        }
    }

    /// Human-readable text for the fixed status set; pure data, used by
    /// callers that display codes to an operator.
    pub fn message(self) -> &'static str {
        match self.0 {
            sys::S_OK => "success",
            sys::S_FALSE => "success (no-op)",
            sys::E_UNEXPECTED => "preconditions not met",
            sys::E_NOTIMPL => "not supported on this model",
            sys::E_ACCESSDENIED => "permission denied (check udev rules)",
            sys::E_OUTOFMEMORY => "out of memory",
            sys::E_INVALIDARG => "invalid argument",
            sys::E_POINTER => "null pointer",
            sys::E_FAIL => "generic failure",
            sys::E_WRONG_THREAD => "called from the wrong thread",
            sys::E_GEN_FAILURE => "device not functioning",
            sys::E_BUSY => "resource in use",
            sys::E_PENDING => "no data available yet",
            sys::E_TIMEOUT => "timeout expired",
            _ => "unknown status",
        }
    }
}

impl fmt::Display for HResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (0x{:08x})", self.message(), self.0 as u32)
    }
}

impl fmt::Debug for HResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "HResult(0x{:08x}: {})", self.0 as u32, self.message())
    }
}

impl std::error::Error for HResult {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_codes() {
        assert!(HResult::OK.succeeded());
        assert!(HResult::FALSE.succeeded());
        assert!(!HResult::OK.failed());
    }

    #[test]
    fn failure_codes() {
        for hr in [
            HResult::UNEXPECTED,
            HResult::NOTIMPL,
            HResult::ACCESSDENIED,
            HResult::OUTOFMEMORY,
            HResult::INVALIDARG,
            HResult::POINTER,
            HResult::FAIL,
            HResult::WRONG_THREAD,
            HResult::GEN_FAILURE,
            HResult::BUSY,
            HResult::PENDING,
            HResult::TIMEOUT,
        ] {
            assert!(hr.failed(), "{hr}");
            assert_ne!(hr.message(), "unknown status");
        }
    }

    #[test]
    fn check_splits_on_sign() {
        assert_eq!(HResult::check(sys::S_FALSE), Ok(HResult::FALSE));
        assert_eq!(HResult::check(sys::E_TIMEOUT), Err(HResult::TIMEOUT));
    }
}
