//! Typed driver and host handles
//!
//! Every handle wraps the raw value the driver hands out. Zero is reserved as
//! the "absent" value and exposed as `INVALID`, so a torn-down handle can never
//! be mistaken for a live one.

macro_rules! driver_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(u64);

        impl $name {
            /// The absent handle
            pub const INVALID: Self = Self(0);

            /// Wrap a raw driver value
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            /// Raw driver value
            pub const fn raw(self) -> u64 {
                self.0
            }

            /// Whether this refers to a live object
            pub const fn is_valid(self) -> bool {
                self.0 != 0
            }

            /// Reset to `INVALID`, returning the previous handle
            pub fn take(&mut self) -> Self {
                std::mem::take(self)
            }
        }
    };
}

driver_handle!(
    /// Platform display connection
    DisplayHandle
);
driver_handle!(
    /// Drawable surface bound to a native window
    SurfaceHandle
);
driver_handle!(
    /// Selected framebuffer config
    ConfigHandle
);
driver_handle!(
    /// GPU context
    ContextHandle
);
driver_handle!(
    /// Host-provided native window
    NativeWindowHandle
);

/// Drawable region of the native window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    /// Left edge
    pub left: u32,
    /// Top edge
    pub top: u32,
    /// Right edge (exclusive)
    pub right: u32,
    /// Bottom edge (exclusive)
    pub bottom: u32,
}

impl CropRect {
    /// Crop anchored at the origin covering `width` x `height`
    pub const fn from_origin(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: width,
            bottom: height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_invalid() {
        assert_eq!(SurfaceHandle::default(), SurfaceHandle::INVALID);
        assert!(!ContextHandle::INVALID.is_valid());
        assert!(DisplayHandle::from_raw(7).is_valid());
    }

    #[test]
    fn test_take_leaves_invalid_behind() {
        let mut surface = SurfaceHandle::from_raw(42);
        let taken = surface.take();

        assert_eq!(taken.raw(), 42);
        assert!(!surface.is_valid());
        assert!(!surface.take().is_valid());
    }
}
