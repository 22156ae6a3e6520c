// ==========================================
// 相机参数模型 - 值类型定义
// ==========================================
// Scalar:   参数内部保存的标量值
// RawValue: 调用方/设备传入的原始值（未转换）
// Literal:  注册表中的常量（默认值/选项/依赖值）
// Rational: 有理数（设备增益寄存器、awb_gains 读数）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 标量类型 (Scalar Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Integer,
    Float,
    Category,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Bool => write!(f, "bool"),
            ScalarKind::Integer => write!(f, "int"),
            ScalarKind::Float => write!(f, "float"),
            ScalarKind::Category => write!(f, "str"),
        }
    }
}

// ==========================================
// 有理数 (Rational)
// ==========================================
// 分母恒为正，分子分母已约分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rational {
    numerator: i64,
    denominator: i64,
}

impl Rational {
    /// 构造有理数
    ///
    /// # 返回
    /// - None: 分母为 0，或约分、规范符号后超出 i64 范围（如 i64::MIN / -1）
    pub fn new(numerator: i64, denominator: i64) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        let divisor = i128::from(gcd(numerator.unsigned_abs(), denominator.unsigned_abs()).max(1));
        let sign: i128 = if denominator < 0 { -1 } else { 1 };
        Some(Self {
            numerator: i64::try_from(sign * i128::from(numerator) / divisor).ok()?,
            denominator: i64::try_from(sign * i128::from(denominator) / divisor).ok()?,
        })
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// 用分母不超过 max_denominator 的最佳有理数逼近浮点值
    ///
    /// # 说明
    /// 连分数展开，截断时在两个候选半收敛子中取误差较小者。
    /// 非有限值或超出 i64 范围的值返回 None。
    pub fn approximate(value: f64, max_denominator: i64) -> Option<Self> {
        if !value.is_finite() || value.abs() >= i64::MAX as f64 || max_denominator < 1 {
            return None;
        }

        let negative = value < 0.0;
        let target = value.abs();

        let (mut p0, mut q0, mut p1, mut q1): (i64, i64, i64, i64) = (0, 1, 1, 0);
        let mut x = target;
        let mut truncated = false;

        loop {
            let a = x.floor() as i64;
            let q2 = q0 + a * q1;
            if q2 > max_denominator {
                truncated = true;
                break;
            }
            let p2 = p0 + a * p1;
            p0 = p1;
            q0 = q1;
            p1 = p2;
            q1 = q2;

            let frac = x - a as f64;
            if frac < 1e-12 {
                break;
            }
            x = 1.0 / frac;
        }

        let (numerator, denominator) = if truncated {
            let k = (max_denominator - q0) / q1;
            let bound1 = (p0 + k * p1, q0 + k * q1);
            let bound2 = (p1, q1);
            let err1 = (bound1.0 as f64 / bound1.1 as f64 - target).abs();
            let err2 = (bound2.0 as f64 / bound2.1 as f64 - target).abs();
            if err2 <= err1 {
                bound2
            } else {
                bound1
            }
        } else {
            (p1, q1)
        };

        let numerator = if negative { -numerator } else { numerator };
        Rational::new(numerator, denominator)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

// ==========================================
// 标量值 (Scalar)
// ==========================================
// 序列化格式: 无标签（JSON 原生 bool / 整数 / 浮点 / 字符串）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Int(_) => ScalarKind::Integer,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::Text(_) => ScalarKind::Category,
        }
    }

    /// 数值视图（布尔与文本不参与数值比较）
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// 跨数值类型的相等判断（100 与 100.0 视为相等）
    pub fn loosely_eq(&self, other: &Scalar) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(true) => write!(f, "True"),
            Scalar::Bool(false) => write!(f, "False"),
            Scalar::Int(v) => write!(f, "{}", v),
            // 整数值的浮点保留 ".0"（1.0 而非 1）
            Scalar::Float(v) => write!(f, "{:?}", v),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

// ==========================================
// 注册表常量 (Literal)
// ==========================================
// 可在 static 中使用的标量常量
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(&'static str),
}

impl Literal {
    pub fn to_scalar(self) -> Scalar {
        match self {
            Literal::Bool(v) => Scalar::Bool(v),
            Literal::Int(v) => Scalar::Int(v),
            Literal::Float(v) => Scalar::Float(v),
            Literal::Text(v) => Scalar::Text(v.to_string()),
        }
    }

    pub fn to_raw(self) -> RawValue {
        RawValue::from(self.to_scalar())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_scalar().fmt(f)
    }
}

// ==========================================
// 原始值 (RawValue)
// ==========================================
// 构造参数或读取设备时的未转换输入
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Rational(Rational),
    List(Vec<RawValue>),
}

impl RawValue {
    /// 单元素列表解包（用于长度为 1 的参数）
    pub fn unwrap_single(self) -> RawValue {
        match self {
            RawValue::List(mut items) if items.len() == 1 => items.remove(0),
            other => other,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Bool(v) => Scalar::Bool(*v).fmt(f),
            RawValue::Int(v) => write!(f, "{}", v),
            RawValue::Float(v) => write!(f, "{:?}", v),
            RawValue::Text(s) => write!(f, "{:?}", s),
            RawValue::Rational(r) => write!(f, "{}", r),
            RawValue::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<Scalar> for RawValue {
    fn from(v: Scalar) -> Self {
        match v {
            Scalar::Bool(b) => RawValue::Bool(b),
            Scalar::Int(i) => RawValue::Int(i),
            Scalar::Float(x) => RawValue::Float(x),
            Scalar::Text(s) => RawValue::Text(s),
        }
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Int(v as i64)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<u32> for RawValue {
    fn from(v: u32) -> Self {
        RawValue::Int(v as i64)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

impl From<Rational> for RawValue {
    fn from(v: Rational) -> Self {
        RawValue::Rational(v)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(v: Vec<T>) -> Self {
        RawValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RawValue>, const N: usize> From<[T; N]> for RawValue {
    fn from(v: [T; N]) -> Self {
        RawValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<RawValue>, B: Into<RawValue>> From<(A, B)> for RawValue {
    fn from(v: (A, B)) -> Self {
        RawValue::List(vec![v.0.into(), v.1.into()])
    }
}

impl<A, B, C, D> From<(A, B, C, D)> for RawValue
where
    A: Into<RawValue>,
    B: Into<RawValue>,
    C: Into<RawValue>,
    D: Into<RawValue>,
{
    fn from(v: (A, B, C, D)) -> Self {
        RawValue::List(vec![v.0.into(), v.1.into(), v.2.into(), v.3.into()])
    }
}

// ==========================================
// 标量转换
// ==========================================

impl ScalarKind {
    /// 将原始值转换为本类型的标量（标量参数的构造器语义）
    ///
    /// # 规则
    /// - int:   浮点截断取整，文本按十进制整数解析，布尔映射为 0/1
    /// - float: 整数/有理数/文本均转为 f64
    /// - bool:  数值非零为真，文本接受 true/false/1/0/on/off（不区分大小写）
    /// - str:   任意标量按其字符串形式
    /// - 有理数仅可转换为 float
    pub fn coerce(&self, name: &str, raw: &RawValue) -> Result<Scalar, CoercionFailure> {
        let fail = || CoercionFailure {
            name: name.to_string(),
            input: raw.to_string(),
            target: self.to_string(),
        };

        match (self, raw) {
            (_, RawValue::List(_)) => Err(fail()),
            (ScalarKind::Float, RawValue::Rational(r)) => Ok(Scalar::Float(r.to_f64())),
            (_, RawValue::Rational(_)) => Err(fail()),

            (ScalarKind::Bool, RawValue::Bool(v)) => Ok(Scalar::Bool(*v)),
            (ScalarKind::Bool, RawValue::Int(v)) => Ok(Scalar::Bool(*v != 0)),
            (ScalarKind::Bool, RawValue::Float(v)) => Ok(Scalar::Bool(*v != 0.0)),
            (ScalarKind::Bool, RawValue::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "on" | "yes" => Ok(Scalar::Bool(true)),
                "false" | "0" | "off" | "no" => Ok(Scalar::Bool(false)),
                _ => Err(fail()),
            },

            (ScalarKind::Integer, RawValue::Bool(v)) => Ok(Scalar::Int(*v as i64)),
            (ScalarKind::Integer, RawValue::Int(v)) => Ok(Scalar::Int(*v)),
            (ScalarKind::Integer, RawValue::Float(v)) => {
                if v.is_finite() && v.abs() < i64::MAX as f64 {
                    Ok(Scalar::Int(v.trunc() as i64))
                } else {
                    Err(fail())
                }
            }
            (ScalarKind::Integer, RawValue::Text(s)) => {
                s.trim().parse::<i64>().map(Scalar::Int).map_err(|_| fail())
            }

            (ScalarKind::Float, RawValue::Bool(v)) => Ok(Scalar::Float(*v as i64 as f64)),
            (ScalarKind::Float, RawValue::Int(v)) => Ok(Scalar::Float(*v as f64)),
            (ScalarKind::Float, RawValue::Float(v)) => Ok(Scalar::Float(*v)),
            (ScalarKind::Float, RawValue::Text(s)) => {
                s.trim().parse::<f64>().map(Scalar::Float).map_err(|_| fail())
            }

            (ScalarKind::Category, RawValue::Text(s)) => Ok(Scalar::Text(s.clone())),
            (ScalarKind::Category, RawValue::Bool(v)) => Ok(Scalar::Text(Scalar::Bool(*v).to_string())),
            (ScalarKind::Category, RawValue::Int(v)) => Ok(Scalar::Text(v.to_string())),
            (ScalarKind::Category, RawValue::Float(v)) => Ok(Scalar::Text(format!("{:?}", v))),
        }
    }

    /// 无损转换（元组元素使用）：整数类型不接受带小数部分的浮点
    pub fn coerce_lossless(&self, name: &str, raw: &RawValue) -> Result<Scalar, CoercionFailure> {
        if let (ScalarKind::Integer, RawValue::Float(v)) = (self, raw) {
            if v.fract() != 0.0 {
                return Err(CoercionFailure {
                    name: name.to_string(),
                    input: raw.to_string(),
                    target: self.to_string(),
                });
            }
        }
        self.coerce(name, raw)
    }
}

/// 转换失败明细（由参数层映射为 ParamError::Coercion）
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionFailure {
    pub name: String,
    pub input: String,
    pub target: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_display_keeps_decimal_point() {
        assert_eq!(Scalar::Float(1.0).to_string(), "1.0");
        assert_eq!(Scalar::Float(1.8).to_string(), "1.8");
        assert_eq!(Scalar::Int(100).to_string(), "100");
        assert_eq!(Scalar::Bool(true).to_string(), "True");
    }

    #[test]
    fn test_coerce_integer_rules() {
        let kind = ScalarKind::Integer;
        assert_eq!(kind.coerce("iso", &RawValue::from("100")), Ok(Scalar::Int(100)));
        assert_eq!(kind.coerce("iso", &RawValue::from(5.7)), Ok(Scalar::Int(5)));
        assert!(kind.coerce("iso", &RawValue::from("abc")).is_err());
        assert!(kind.coerce("iso", &RawValue::from("5.0")).is_err());
        assert!(kind.coerce_lossless("dimension", &RawValue::from(5.5)).is_err());
        assert_eq!(
            kind.coerce_lossless("dimension", &RawValue::from(5.0)),
            Ok(Scalar::Int(5))
        );
    }

    #[test]
    fn test_rational_only_coerces_to_float() {
        let half = Rational::new(1, 2).unwrap();
        assert_eq!(
            ScalarKind::Float.coerce("awb_gain", &RawValue::from(half)),
            Ok(Scalar::Float(0.5))
        );
        assert!(ScalarKind::Integer.coerce("iso", &RawValue::from(half)).is_err());
    }

    #[test]
    fn test_rational_normalization() {
        let r = Rational::new(4, -8).unwrap();
        assert_eq!(r.numerator(), -1);
        assert_eq!(r.denominator(), 2);
        assert!(Rational::new(1, 0).is_none());
    }

    #[test]
    fn test_rational_extreme_values() {
        // -i64::MIN 无法表示
        assert!(Rational::new(i64::MIN, -1).is_none());

        let one = Rational::new(i64::MIN, i64::MIN).unwrap();
        assert_eq!((one.numerator(), one.denominator()), (1, 1));

        let min = Rational::new(i64::MIN, 1).unwrap();
        assert_eq!(min.numerator(), i64::MIN);

        let half = Rational::new(i64::MIN, -2).unwrap();
        assert_eq!((half.numerator(), half.denominator()), (1 << 62, 1));

        // 分母规范为正后为 2^63
        assert!(Rational::new(i64::MAX, i64::MIN).is_none());
    }

    #[test]
    fn test_rational_approximate() {
        let r = Rational::approximate(5.3, 65536).unwrap();
        assert_eq!((r.numerator(), r.denominator()), (53, 10));

        let r = Rational::approximate(2.0, 65536).unwrap();
        assert_eq!((r.numerator(), r.denominator()), (2, 1));

        let r = Rational::approximate(std::f64::consts::PI, 100).unwrap();
        assert_eq!((r.numerator(), r.denominator()), (311, 99));

        assert!(Rational::approximate(f64::NAN, 10).is_none());
    }

    #[test]
    fn test_scalar_loose_equality() {
        assert!(Scalar::Int(100).loosely_eq(&Scalar::Float(100.0)));
        assert!(!Scalar::Text("off".into()).loosely_eq(&Scalar::Text("auto".into())));
    }
}
