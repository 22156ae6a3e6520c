// ==========================================
// 参数集 - 编解码与持久化
// ==========================================
// 查询串: application/x-www-form-urlencoded（空格编码为 '+'）
// 传输:   查询串文本再按指定文本编码转换为字节
// 持久化: as_dict() 的 JSON 文件
// ==========================================

use super::ParameterSet;
use crate::domain::value::{RawValue, Scalar};
use crate::error::{ParamError, ParamResult};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, error};

// ==========================================
// 文本编码 (Text Encoding)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Latin1,
}

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
        }
    }

    pub fn encode(self, text: &str) -> ParamResult<Vec<u8>> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| {
                        error!("Could not encode {:?} as {}", c, self.label());
                        ParamError::Encoding {
                            encoding: self.label().to_string(),
                            message: format!("字符 {:?} 无法编码", c),
                        }
                    })
                })
                .collect(),
        }
    }

    pub fn decode(self, bytes: &[u8]) -> ParamResult<String> {
        match self {
            TextEncoding::Utf8 => {
                String::from_utf8(bytes.to_vec()).map_err(|e| {
                    error!("Could not decode query as {}: {}", self.label(), e);
                    ParamError::Encoding {
                        encoding: self.label().to_string(),
                        message: e.to_string(),
                    }
                })
            }
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

fn encode_component(text: &str, encoding: TextEncoding) -> ParamResult<String> {
    let bytes = encoding.encode(text)?;
    Ok(urlencoding::encode_binary(&bytes).replace("%20", "+"))
}

fn decode_component(text: &str, encoding: TextEncoding) -> ParamResult<String> {
    let unplussed = text.replace('+', " ");
    let bytes = urlencoding::decode_binary(unplussed.as_bytes());
    encoding.decode(&bytes)
}

/// 解析查询串，每个键只保留第一个值；空值与无 '=' 的片段被忽略
fn parse_query(text: &str, encoding: TextEncoding) -> ParamResult<BTreeMap<String, String>> {
    let mut result = BTreeMap::new();
    for pair in text.split('&').filter(|p| !p.is_empty()) {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        let key = decode_component(key, encoding)?;
        let value = decode_component(value, encoding)?;
        result.entry(key).or_insert(value);
    }
    Ok(result)
}

impl ParameterSet {
    /// 编码为查询串字节
    ///
    /// # 示例
    /// `iso=100&zoom=0.0%2C0.0%2C1.0%2C1.0`
    pub fn urlencode(&self, encoding: TextEncoding) -> ParamResult<Vec<u8>> {
        let pairs = self
            .as_dict()
            .iter()
            .map(|(key, value)| {
                Ok(format!(
                    "{}={}",
                    encode_component(key, encoding)?,
                    encode_component(&value.to_string(), encoding)?
                ))
            })
            .collect::<ParamResult<Vec<_>>>()?;

        encoding.encode(&pairs.join("&"))
    }

    /// 从查询串字节恢复，完全替换当前内容
    ///
    /// 失败时当前内容保持不变
    pub fn restore_from_query(&mut self, query: &[u8], encoding: TextEncoding) -> ParamResult<()> {
        let text = encoding.decode(query)?;
        let params = parse_query(&text, encoding)?;
        debug!("Restoring {} parameters from query string", params.len());

        let restored = ParameterSet::new(
            params.into_iter().map(|(k, v)| (k, RawValue::Text(v))),
            false,
        )?;
        *self = restored;
        Ok(())
    }

    /// 以查询串字节构造
    pub fn from_query(query: &[u8], encoding: TextEncoding) -> ParamResult<Self> {
        let mut set = ParameterSet::empty();
        set.restore_from_query(query, encoding)?;
        Ok(set)
    }

    /// 将 as_dict() 写入 JSON 文件
    pub fn persist(&self, path: impl AsRef<Path>) -> ParamResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            error!("Could not create {}: {}", path.display(), e);
            e
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.as_dict())?;
        Ok(())
    }

    /// 读取 persist() 写出的文件
    pub fn load_persisted(path: impl AsRef<Path>) -> ParamResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            error!("Could not open {}: {}", path.display(), e);
            e
        })?;
        let dict: BTreeMap<String, Scalar> = serde_json::from_reader(BufReader::new(file))?;
        ParameterSet::new(dict, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_encoding() {
        assert_eq!(
            encode_component("1.0,1.0", TextEncoding::Utf8).unwrap(),
            "1.0%2C1.0"
        );
        assert_eq!(encode_component("a b", TextEncoding::Utf8).unwrap(), "a+b");
        assert_eq!(
            decode_component("a+b%2Cc", TextEncoding::Utf8).unwrap(),
            "a b,c"
        );
    }

    #[test]
    fn test_parse_query_keeps_first_value() {
        let parsed = parse_query("iso=100&iso=200&flag&empty=", TextEncoding::Utf8).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["iso"], "100");
    }

    #[test]
    fn test_latin1_round_trip() {
        let bytes = TextEncoding::Latin1.encode("café").unwrap();
        assert_eq!(bytes, vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(TextEncoding::Latin1.decode(&bytes).unwrap(), "café");
        assert!(TextEncoding::Latin1.encode("相机").is_err());
    }

    #[test]
    fn test_invalid_utf8_is_encoding_error() {
        let err = TextEncoding::Utf8.decode(&[0xFF, 0xFE]).unwrap_err();
        assert!(matches!(err, ParamError::Encoding { .. }));
    }

    #[test]
    fn test_encoding_errors_are_logged() {
        let output = crate::logging::capture(|| {
            assert!(TextEncoding::Latin1.encode("相机").is_err());
            assert!(TextEncoding::Utf8.decode(&[0xFF]).is_err());
        });
        assert!(output.contains("Could not encode"));
        assert!(output.contains("Could not decode query as utf-8"));
    }
}
