//! Field names of the metadata wire contract.
//!
//! Every implementation of the store, remote or in-memory, must produce maps
//! using exactly these names.

pub const KEY: &str = "key";
pub const UUID: &str = "uuid";
pub const VERSION_NUMBER: &str = "versionNumber";
pub const TAG: &str = "tag";
pub const STATUS: &str = "status";
pub const TIMESTAMP: &str = "timestamp";
pub const CREATION_DATE: &str = "creationDate";
pub const CHECKSUM: &str = "checksum";
pub const SIZE: &str = "size";
pub const USER_METADATA: &str = "userMetadata";
pub const OBJECTS: &str = "objects";
pub const REPROXY_URL: &str = "reproxyURL";
pub const DOWNLOAD_NAME: &str = "downloadName";
pub const CONTENT_TYPE: &str = "contentType";
