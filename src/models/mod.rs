//! Typed mirrors of the documents the upstream persists. The gateway never
//! stores these; they pin the wire contract where a route reshapes or
//! inspects upstream data instead of passing it through verbatim.

pub mod banner;
pub mod content;
pub mod qr;

pub use banner::{Banner, BannerSettings};
pub use content::{Announcement, Notice, NoticeCategory, Personnel, PersonnelCategory, Popup, PublishStatus};
pub use qr::{QrCode, QrKind, ScanResolution};
