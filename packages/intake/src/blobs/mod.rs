//! Object-storage implementations of [`BlobStore`](crate::traits::BlobStore).

mod cloudinary;

pub use cloudinary::CloudinaryBlobStore;
