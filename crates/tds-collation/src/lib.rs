//! Collation code page support for SQL Server bulk loading.
//!
//! SQL Server reports a narrow-character column's encoding as a numeric
//! Windows code page derived from the column's collation
//! (`COLLATIONPROPERTY(COLLATION_NAME, 'CodePage')`). This crate holds the
//! fixed mapping from those code page numbers to byte encoders, along with
//! the byte rules for applying them.
//!
//! # Supported code pages
//!
//! | Code Page | Encoding | Languages |
//! |-----------|----------|-----------|
//! | 437 | IBM PC (OEM) | DOS Latin US |
//! | 850 | IBM PC (OEM) | DOS Latin 1 |
//! | 874 | Windows-874 (TIS-620) | Thai |
//! | 932 | Shift_JIS | Japanese |
//! | 936 | GBK | Simplified Chinese |
//! | 949 | EUC-KR | Korean |
//! | 950 | Big5 | Traditional Chinese |
//! | 1250 | Windows-1250 | Central/Eastern European |
//! | 1251 | Windows-1251 | Cyrillic |
//! | 1252 | Windows-1252 | Western European (default) |
//! | 1253 | Windows-1253 | Greek |
//! | 1254 | Windows-1254 | Turkish |
//! | 1255 | Windows-1255 | Hebrew |
//! | 1256 | Windows-1256 | Arabic |
//! | 1257 | Windows-1257 | Baltic |
//! | 1258 | Windows-1258 | Vietnamese |
//! | 65001 | UTF-8 | SQL Server 2019+ `_UTF8` collations |
//!
//! Code pages outside this table have no encoder; columns using one are
//! left for the caller to pass through untouched.
//!
//! # References
//!
//! - [Code Page Identifiers](https://learn.microsoft.com/en-us/windows/win32/intl/code-page-identifiers)
//! - [COLLATIONPROPERTY](https://learn.microsoft.com/en-us/sql/t-sql/functions/collationproperty-transact-sql)

#![warn(missing_docs)]
#![deny(unsafe_code)]

use encoding_rs::Encoding;

/// A byte encoder resolved from a collation code page.
///
/// The mapping is process-wide, read-only state: WHATWG encodings are
/// `&'static` and the OEM tables are compiled in, so values are `Copy` and
/// safe to share across calls without synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePageEncoding {
    /// An encoding defined by the WHATWG Encoding Standard.
    Whatwg(&'static Encoding),
    /// IBM PC (OEM) code page 437, DOS Latin US.
    Cp437,
    /// IBM PC (OEM) code page 850, DOS Latin 1.
    Cp850,
}

impl CodePageEncoding {
    /// Returns the encoder for a collation code page, if known.
    ///
    /// SQL Server can report code pages this table does not carry; those
    /// return `None` and the column's values are sent unconverted.
    #[must_use]
    pub fn for_code_page(code_page: u16) -> Option<Self> {
        match code_page {
            437 => Some(Self::Cp437),
            850 => Some(Self::Cp850),
            874 => Some(Self::Whatwg(encoding_rs::WINDOWS_874)),
            932 => Some(Self::Whatwg(encoding_rs::SHIFT_JIS)),
            936 => Some(Self::Whatwg(encoding_rs::GBK)),
            949 => Some(Self::Whatwg(encoding_rs::EUC_KR)),
            950 => Some(Self::Whatwg(encoding_rs::BIG5)),
            1250 => Some(Self::Whatwg(encoding_rs::WINDOWS_1250)),
            1251 => Some(Self::Whatwg(encoding_rs::WINDOWS_1251)),
            1252 => Some(Self::Whatwg(encoding_rs::WINDOWS_1252)),
            1253 => Some(Self::Whatwg(encoding_rs::WINDOWS_1253)),
            1254 => Some(Self::Whatwg(encoding_rs::WINDOWS_1254)),
            1255 => Some(Self::Whatwg(encoding_rs::WINDOWS_1255)),
            1256 => Some(Self::Whatwg(encoding_rs::WINDOWS_1256)),
            1257 => Some(Self::Whatwg(encoding_rs::WINDOWS_1257)),
            1258 => Some(Self::Whatwg(encoding_rs::WINDOWS_1258)),
            65001 => Some(Self::Whatwg(encoding_rs::UTF_8)),
            _ => None,
        }
    }

    /// Returns the encoding name for error messages and logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Whatwg(encoding) => encoding.name(),
            Self::Cp437 => "cp437",
            Self::Cp850 => "cp850",
        }
    }

    /// Encodes `text` into this code page's byte representation.
    ///
    /// Returns `None` when `text` contains a character the code page
    /// cannot represent.
    #[must_use]
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        match self {
            Self::Whatwg(encoding) => {
                let (bytes, _, had_errors) = encoding.encode(text);
                if had_errors {
                    None
                } else {
                    Some(bytes.into_owned())
                }
            }
            Self::Cp437 => {
                oem_cp::encode_string_checked(text, &oem_cp::code_table::ENCODING_TABLE_CP437)
            }
            Self::Cp850 => {
                oem_cp::encode_string_checked(text, &oem_cp::code_table::ENCODING_TABLE_CP850)
            }
        }
    }
}
