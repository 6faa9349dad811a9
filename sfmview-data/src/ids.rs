//! Index spaces used by a scene document.
//!
//! Track ids share the point-cloud index space, image and feature ids come
//! straight from the visibility file, and view indices are assigned while the
//! views file is read. They are distinct types so they cannot be mixed up.

use std::fmt;

macro_rules! index_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub usize);

        impl $name {
            /// The raw index value.
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl From<usize> for $name {
            fn from(value: usize) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

index_type!(
    /// Sequential track id; track `i` owns point `i` of the point cloud.
    TrackId
);
index_type!(
    /// Image id as written in the visibility file.
    ImageId
);
index_type!(
    /// Feature id within an image.
    FeatureId
);
index_type!(
    /// Sequential view index assigned in views-file order.
    ViewIndex
);
