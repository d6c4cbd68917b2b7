// Copyright 2026 bitstream developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error and verification traits

use std::error::Error;
use std::fmt;

/// Error returned when a bit position is not inside the logical bit range.
///
/// This is the only error that the read path of [`BitBuffer`] can emit.
///
/// [`BitBuffer`]: crate::bitbuf::BitBuffer
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub struct OutOfRangeError {
    position: usize,
    bit_count: usize,
}

impl OutOfRangeError {
    /// Constructs `OutOfRangeError` for an access at `position`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::error::*;
    /// let err = OutOfRangeError::new(5, 5);
    /// assert_eq!(
    ///     format!("{}", err),
    ///     "bit position out of range: `position`=5, `bit_count`=5"
    /// );
    /// ```
    pub const fn new(position: usize, bit_count: usize) -> Self {
        Self {
            position,
            bit_count,
        }
    }

    /// Returns the position that was requested.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the logical bit count at the time of the access.
    pub const fn bit_count(&self) -> usize {
        self.bit_count
    }
}

impl Error for OutOfRangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bit position out of range: `position`={}, `bit_count`={}",
            self.position, self.bit_count
        )
    }
}

/// Error emitted when an argument is out of the supported range.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub struct RangeError {
    var: String,
    reason: String,
    actual: String,
}

impl RangeError {
    /// Makes range error from `actual: impl Display` that is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::error::*;
    /// let err = RangeError::from_display("width", "must be less than or equal to 32", &33);
    /// assert_eq!(
    ///     format!("{}", err),
    ///     "`width` is out of range: must be less than or equal to 32 (actual=33)"
    /// );
    /// ```
    pub fn from_display<T>(var: &str, reason: &str, actual: &T) -> Self
    where
        T: fmt::Display,
    {
        Self {
            var: var.to_owned(),
            reason: reason.to_owned(),
            actual: format!("{actual}"),
        }
    }

    /// Returns the name of the variable that is out of range.
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Error for RangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` is out of range: {} (actual={})",
            self.var, self.reason, self.actual
        )
    }
}

/// Error object returned when integrity verification failed.
///
/// This error maintains a path to the component that is actually erroneous
/// in the nested components.
///
/// # Design Notes
///
/// Values built through the constructors and append methods of this crate
/// are always consistent. Verification is only needed for values that enter
/// from outside, e.g. a [`BitBuffer`] or a [`config::Buffer`] obtained via
/// deserialization.
///
/// [`BitBuffer`]: crate::bitbuf::BitBuffer
/// [`config::Buffer`]: crate::config::Buffer
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub struct VerifyError {
    components: Vec<String>,
    reason: String,
}

impl VerifyError {
    /// Makes verification error for an invalid variable `component`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::error::*;
    /// let err = VerifyError::new("group_size", "must be non-zero");
    /// assert_eq!(
    ///     format!("{}", err),
    ///     "verification error: `group_size` is not valid. reason: must be non-zero"
    /// );
    /// ```
    pub fn new(component: &str, reason: &str) -> Self {
        Self {
            components: vec![component.to_owned()],
            reason: reason.to_owned(),
        }
    }

    /// Prepends the name of an enclosing component to the error location.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::error::*;
    /// let err = VerifyError::new("group_size", "must be non-zero");
    /// let err = err.within("render");
    /// assert_eq!(
    ///     format!("{}", err),
    ///     "verification error: `render.group_size` is not valid. reason: must be non-zero"
    /// );
    /// ```
    #[must_use]
    pub fn within(self, component: &str) -> Self {
        let mut components = self.components;
        let reason = self.reason;
        components.push(component.to_owned());
        Self { components, reason }
    }

    /// Gets dot-separated path string for the error location.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::error::*;
    /// let err = VerifyError::new("group_size", "must be non-zero");
    /// let err = err.within("render").within("buffer");
    /// assert_eq!(err.path(), "buffer.render.group_size");
    /// ```
    pub fn path(&self) -> String {
        let mut path = String::new();
        for (i, name) in self.components.iter().rev().enumerate() {
            if i != 0 {
                path.push('.');
            }
            path.push_str(name);
        }
        path
    }
}

impl Error for VerifyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "verification error: `{}` is not valid. reason: {}",
            self.path(),
            self.reason
        )
    }
}

/// A wrapper that ensures that the inner `T` is verified and unchanged.
///
/// `Verified<T>` can be obtained via [`Verify::into_verified`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Verified<T>(T);

impl<T> std::ops::Deref for Verified<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> Verified<T> {
    /// Unwraps the verified value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Trait for verifiable structs.
pub trait Verify: Sized + seal_verify::Sealed {
    /// Verifies there's no internal data inconsistency.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError` if there's an invalid variable.
    ///
    /// # Examples
    ///
    /// [`config::Render`] implements `Verify`.
    ///
    /// [`config::Render`]: crate::config::Render
    ///
    /// ```
    /// # use bitstream::error::*;
    /// # use bitstream::config::Render;
    /// let mut render = Render::default();
    /// render.group_size = 0;  // invalid setting
    /// assert!(render.verify().is_err());
    ///
    /// render.group_size = 4; // valid setting
    /// assert!(render.verify().is_ok());
    /// ```
    fn verify(&self) -> Result<(), VerifyError>;

    /// Wraps into `Verified` to indicate that the data is already verified.
    ///
    /// # Errors
    ///
    /// Returns the original input and `VerifyError` if `verify` failed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitstream::error::*;
    /// # use bitstream::config::Render;
    /// let mut render = Render::default();
    /// render.group_size = 0;
    /// let (render, err) = render.into_verified().unwrap_err();
    /// assert_eq!(err.path(), "group_size");
    ///
    /// let mut render = render;
    /// render.group_size = 8;
    /// assert_eq!(render.into_verified().unwrap().group_size, 8);
    /// ```
    fn into_verified(self) -> Result<Verified<Self>, (Self, VerifyError)> {
        let result = self.verify();
        if let Err(e) = result {
            Err((self, e))
        } else {
            Ok(Verified(self))
        }
    }
}

/// A wrapping function to make it compatible with "?" operator.
pub(crate) fn verify_macro_impl(cond: bool, varname: &str, msg: &str) -> Result<(), VerifyError> {
    if !cond {
        return Err(VerifyError::new(varname, msg));
    }
    Ok(())
}

/// Checks if `$cond` is true and do `return Err(...)` if so.
///
/// An error object `VerifyErr` is constructed using `$varname` and
/// `$msg` that are formatted using the extra args (`$args`).
macro_rules! verify_true {
    ($varname:literal, $cond:expr, $msg:literal, $($args: expr),*) => {
        crate::error::verify_macro_impl(
            $cond,
            &format!($varname, $($args),*),
            &format!($msg, $($args),*),
        )
    };
    ($varname:literal, $cond:expr, $msg:literal) => {
        verify_true!($varname, $cond, $msg,)
    }
}
pub(crate) use verify_true;

/// Checks if `$actual` is in the range, and emits err with default msgs if not.
///
/// An error is constructed using the same way as [`verify_true`].
macro_rules! verify_range {
    ($varname: literal, $actual:expr, $lowlimit:tt ..= $highlimit:tt) => {
        verify_range!($varname, $actual, ($lowlimit)..)
            .and_then(|()| verify_range!($varname, $actual, ..=($highlimit)))
    };
    ($varname: literal, $actual:expr, $lowlimit:tt ..) => {{
        #[allow(unused_parens)]
        let limit = $lowlimit;
        verify_true!(
            $varname,
            $actual >= limit,
            "must be greater than or equal to {limit}"
        )
    }};
    ($varname: literal, $actual:expr, ..= $highlimit:tt) => {{
        #[allow(unused_parens)]
        let limit = $highlimit;
        verify_true!(
            $varname,
            $actual <= limit,
            "must be less than or equal to {limit}"
        )
    }};
}
pub(crate) use verify_range;

mod seal_verify {
    pub trait Sealed {}

    impl Sealed for crate::bitbuf::BitBuffer {}
    impl Sealed for crate::config::Buffer {}
    impl Sealed for crate::config::Render {}
}
