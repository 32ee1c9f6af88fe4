//! Operator implementations for transparent single-field newtypes.

/// Implements a std::ops trait for a newtype wrapping a primitive numeric type.
///
/// * `binary` covers `Add`/`Sub`-style traits (`T op T -> T`).
/// * `inplace` covers the assigning variants (`T op= T`).
/// * `unary` covers `Neg`-style traits (`op T -> T`).
#[macro_export]
macro_rules! op {
    (binary $ty:ty, $op:ident, $method:ident) => {
        impl std::ops::$op for $ty {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                Self(std::ops::$op::$method(self.0, rhs.0))
            }
        }
    };

    (inplace $ty:ty, $op:ident, $method:ident) => {
        impl std::ops::$op for $ty {
            fn $method(&mut self, rhs: Self) {
                std::ops::$op::$method(&mut self.0, rhs.0)
            }
        }
    };

    (unary $ty:ty, $op:ident, $method:ident) => {
        impl std::ops::$op for $ty {
            type Output = Self;

            fn $method(self) -> Self::Output {
                Self(std::ops::$op::$method(self.0))
            }
        }
    };
}
