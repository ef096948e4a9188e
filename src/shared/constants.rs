/// Default page size for file search
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum length of a single tag
pub const MAX_TAG_LENGTH: usize = 256;

/// Maximum length of a file name, in characters
pub const MAX_FILE_NAME_LENGTH: usize = 255;
