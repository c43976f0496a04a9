#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use fixconv_image as image;

#[doc(inline)]
pub use fixconv_imgproc as imgproc;
