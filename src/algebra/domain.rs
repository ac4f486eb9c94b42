//! Value domains and the casting rules between them.

use std::fmt;

/// A type that can be stored in a container or passed through an operator.
///
/// Every plain-old-data type qualifies; the unit type `()` is the domain of
/// pattern containers, which carry no values.
pub trait Domain: Copy + Default + Send + Sync + fmt::Debug + 'static {}

impl<T> Domain for T where T: Copy + Default + Send + Sync + fmt::Debug + 'static {}

/// Conversion from one domain into another.
///
/// `cast_or` receives the value a pattern entry stands for; only the unit
/// domain makes use of it.
pub trait Cast<To> {
    fn cast(self) -> To;

    fn cast_or(self, implied: To) -> To
    where
        Self: Sized,
    {
        let _ = implied;
        self.cast()
    }
}

macro_rules! cast_numeric {
    ($from:ty => $($to:ty),*) => {
        $(
            impl Cast<$to> for $from {
                #[inline]
                fn cast(self) -> $to {
                    self as $to
                }
            }
        )*

        impl Cast<bool> for $from {
            #[inline]
            fn cast(self) -> bool {
                self != (0 as $from)
            }
        }

        impl Cast<$from> for bool {
            #[inline]
            fn cast(self) -> $from {
                (self as u8) as $from
            }
        }

        impl Cast<()> for $from {
            #[inline]
            fn cast(self) {}
        }
    };
}

macro_rules! cast_all_numeric {
    ($($from:ty),*) => {
        $(
            cast_numeric!($from => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
        )*
    };
}

cast_all_numeric!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Cast<bool> for bool {
    #[inline]
    fn cast(self) -> bool {
        self
    }
}

impl Cast<()> for bool {
    #[inline]
    fn cast(self) {}
}

impl<A, B> Cast<(A, B)> for (A, B) {
    #[inline]
    fn cast(self) -> (A, B) {
        self
    }
}

impl<A, B> Cast<()> for (A, B) {
    #[inline]
    fn cast(self) {}
}

/// Pattern entries read as whatever value the caller implies for them.
impl<To: Default> Cast<To> for () {
    #[inline]
    fn cast(self) -> To {
        To::default()
    }

    #[inline]
    fn cast_or(self, implied: To) -> To {
        implied
    }
}

/// Opt a user-defined plain-old-data type into the casting rules: it casts to
/// itself and to the unit domain.
///
/// ```
/// #[derive(Clone, Copy, Default, Debug, PartialEq)]
/// struct Rgb(u8, u8, u8);
/// grb::user_domain!(Rgb);
///
/// use grb::Cast;
/// let c: Rgb = Rgb(1, 2, 3).cast();
/// assert_eq!(c, Rgb(1, 2, 3));
/// ```
#[macro_export]
macro_rules! user_domain {
    ($($t:ty),* $(,)?) => {
        $(
            impl $crate::algebra::domain::Cast<$t> for $t {
                #[inline]
                fn cast(self) -> $t {
                    self
                }
            }

            impl $crate::algebra::domain::Cast<()> for $t {
                #[inline]
                fn cast(self) {}
            }
        )*
    };
}
