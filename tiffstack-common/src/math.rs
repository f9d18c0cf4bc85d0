#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("Operation {0:?} + {1:?} overflowed")]
    AddFailed(Option<u128>, Option<u128>),
    #[error("Operation {0:?} - {1:?} overflowed")]
    SubFailed(Option<u128>, Option<u128>),
    #[error("Operation {0:?} * {1:?} overflowed")]
    MulFailed(Option<u128>, Option<u128>),
    #[error("Operation {0:?} / {1:?} failed")]
    DivFailed(Option<u128>, Option<u128>),
    #[error("Conversion failed for value {0:?}")]
    ConversionFailed(Option<i128>),
}

/// Accumulates the result of a chain of checked operations
///
/// The first failing operation is kept and every later one is skipped.
///
/// ```
/// # use tiffstack_common::math::Checked;
/// let rows = Checked::new(16_usize);
/// assert_eq!((rows * 4_usize * 3_usize).check(), Ok(192));
///
/// let huge = Checked::new(usize::MAX);
/// assert!((huge * 2_usize).check().is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Checked<T>(Result<T, MathError>);

impl<T> Checked<T> {
    pub fn new(val: T) -> Self {
        Self(Ok(val))
    }

    pub fn check(self) -> Result<T, MathError> {
        self.0
    }
}

impl<T> From<T> for Checked<T> {
    fn from(val: T) -> Self {
        Self(Ok(val))
    }
}

/// Redefines local variables as [`Checked`]
///
/// ```
/// use tiffstack_common::math::checked;
///
/// let width = 4_usize;
/// let height = 3_usize;
/// checked![width];
///
/// assert_eq!((width * height).check(), Ok(12));
/// ```
#[macro_export]
macro_rules! checked [
    ($($v:ident$(,)?)*) => {
        $( let $v = $crate::math::Checked::new($v); )*
    };
];

pub use checked;

macro_rules! impl_operator {
    ($op:ident, $f:ident, $t:ty) => {
        paste::paste! {
            impl [< Safe $op >] for $t {
                fn [< safe_ $f >](self, rhs: $t) -> Result<$t, MathError> {
                    self.[< checked_ $f >](rhs).ok_or_else(|| {
                        MathError::[< $op Failed >](self.try_into().ok(), rhs.try_into().ok())
                    })
                }
            }

            impl<R: Into<Checked<$t>>> std::ops::$op<R> for Checked<$t> {
                type Output = Self;

                #[inline]
                fn $f(self, rhs: R) -> Self::Output {
                    let x = match self.0 {
                        Ok(x) => x,
                        Err(_) => return self,
                    };
                    match rhs.into().0 {
                        Ok(y) => Checked(x.[< safe_ $f >](y)),
                        Err(err) => Checked(Err(err)),
                    }
                }
            }
        }
    };
}

macro_rules! impl_operators {
    ($($t:ty),*) => {
        $(
            impl_operator!(Add, add, $t);
            impl_operator!(Sub, sub, $t);
            impl_operator!(Mul, mul, $t);
            impl_operator!(Div, div, $t);
        )*
    };
}

/// Same as `checked_add` but returns an error
pub trait SafeAdd: Sized {
    fn safe_add(self, rhs: Self) -> Result<Self, MathError>;
}

/// Same as `checked_sub` but returns an error
pub trait SafeSub: Sized {
    fn safe_sub(self, rhs: Self) -> Result<Self, MathError>;
}

/// Same as `checked_mul` but returns an error
pub trait SafeMul: Sized {
    fn safe_mul(self, rhs: Self) -> Result<Self, MathError>;
}

/// Same as `checked_div` but returns an error, also for division by zero
pub trait SafeDiv: Sized {
    fn safe_div(self, rhs: Self) -> Result<Self, MathError>;
}

impl_operators!(u16, u32, u64, usize);

macro_rules! impl_conversion {
    ($name:ident, $f:ident, $target:ty, [$($t:ty),*]) => {
        pub trait $name: Sized + TryInto<$target> + TryInto<i128> + Copy {
            fn $f(self) -> Result<$target, MathError> {
                self.try_into()
                    .map_err(|_| MathError::ConversionFailed(self.try_into().ok()))
            }
        }

        $( impl $name for $t {} )*
    };
}

impl_conversion!(ToU16, u16, u16, [u32, u64, usize, i64]);
impl_conversion!(ToU32, u32, u32, [u16, u64, usize, i64]);
impl_conversion!(ToU64, u64, u64, [u16, u32, u64, usize, i64]);
impl_conversion!(ToUsize, usize, usize, [u16, u32, u64, i64]);
