use crate::utils::error::{FakeProcessError, Result};
use flate2::read::{MultiGzDecoder, ZlibDecoder};
use serde::{Deserialize, Serialize};
use std::io::Read;
use xz2::read::XzDecoder;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const DEFLATE_METHOD: u8 = 8;
const XZ_MAGIC: [u8; 6] = [0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00];

/// 壓縮格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    /// 依 magic bytes 判斷
    #[default]
    Auto,
    Gzip,
    Zlib,
    Xz,
}

impl Codec {
    /// 依據實際的資料決定最後要用的格式
    ///
    /// 在第一輪開始前就檢查標頭，格式不對時一個 chunk 都不會讀。
    pub fn resolve(self, payload: &[u8]) -> Result<Codec> {
        match self {
            Codec::Auto => {
                if looks_like_gzip(payload) {
                    Ok(Codec::Gzip)
                } else if looks_like_xz(payload) {
                    Ok(Codec::Xz)
                } else if looks_like_zlib(payload) {
                    Ok(Codec::Zlib)
                } else {
                    Err(FakeProcessError::StreamInitError {
                        message: format!(
                            "unrecognised compression format (first bytes: {})",
                            hex_prefix(payload)
                        ),
                    })
                }
            }
            Codec::Gzip if looks_like_gzip(payload) => Ok(Codec::Gzip),
            Codec::Zlib if looks_like_zlib(payload) => Ok(Codec::Zlib),
            Codec::Xz if looks_like_xz(payload) => Ok(Codec::Xz),
            explicit => Err(FakeProcessError::StreamInitError {
                message: format!(
                    "payload does not start with a valid {} header (first bytes: {})",
                    explicit.name(),
                    hex_prefix(payload)
                ),
            }),
        }
    }

    /// 建立新的解壓縮串流
    ///
    /// `Auto` 必須先經過 [`Codec::resolve`]，這裡當作 gzip 處理。
    pub fn open<'a, R: Read + 'a>(self, reader: R) -> Box<dyn Read + 'a> {
        match self {
            Codec::Zlib => Box::new(ZlibDecoder::new(reader)),
            Codec::Xz => Box::new(XzDecoder::new_multi_decoder(reader)),
            Codec::Gzip | Codec::Auto => Box::new(MultiGzDecoder::new(reader)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Codec::Auto => "auto",
            Codec::Gzip => "gzip",
            Codec::Zlib => "zlib",
            Codec::Xz => "xz",
        }
    }
}

fn looks_like_gzip(payload: &[u8]) -> bool {
    // 10 bytes 固定標頭
    payload.len() >= 10 && payload[..2] == GZIP_MAGIC && payload[2] == DEFLATE_METHOD
}

fn looks_like_xz(payload: &[u8]) -> bool {
    payload.starts_with(&XZ_MAGIC)
}

fn looks_like_zlib(payload: &[u8]) -> bool {
    // RFC 1950: CM = 8, CINFO <= 7, (CMF * 256 + FLG) % 31 == 0
    if payload.len() < 2 {
        return false;
    }
    let cmf = payload[0];
    let flg = payload[1];
    cmf & 0x0f == DEFLATE_METHOD && cmf >> 4 <= 7 && (u16::from(cmf) << 8 | u16::from(flg)) % 31 == 0
}

fn hex_prefix(payload: &[u8]) -> String {
    if payload.is_empty() {
        return "<empty>".to_string();
    }
    payload
        .iter()
        .take(4)
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
