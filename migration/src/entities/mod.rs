pub mod qr_code;
pub mod scan;

pub use qr_code::Entity as QrCodeEntity;
pub use scan::Entity as ScanEntity;
