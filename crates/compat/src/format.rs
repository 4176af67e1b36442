//! printf-style message formatting over heterogeneous values.

use serde_json::Value;

/// One argument of a compat call.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatArg {
    /// A missing value, rendered as `undefined`.
    Undefined,
    Value(Value),
}

impl From<Value> for FormatArg {
    fn from(value: Value) -> Self {
        FormatArg::Value(value)
    }
}

impl From<&str> for FormatArg {
    fn from(value: &str) -> Self {
        FormatArg::Value(Value::String(value.to_string()))
    }
}

impl From<String> for FormatArg {
    fn from(value: String) -> Self {
        FormatArg::Value(Value::String(value))
    }
}

impl From<&String> for FormatArg {
    fn from(value: &String) -> Self {
        FormatArg::Value(Value::String(value.clone()))
    }
}

impl From<bool> for FormatArg {
    fn from(value: bool) -> Self {
        FormatArg::Value(Value::Bool(value))
    }
}

impl From<i64> for FormatArg {
    fn from(value: i64) -> Self {
        FormatArg::Value(value.into())
    }
}

impl From<i32> for FormatArg {
    fn from(value: i32) -> Self {
        FormatArg::Value(value.into())
    }
}

impl From<u64> for FormatArg {
    fn from(value: u64) -> Self {
        FormatArg::Value(value.into())
    }
}

impl From<f64> for FormatArg {
    /// Non-finite floats have no JSON form and become `null`.
    fn from(value: f64) -> Self {
        FormatArg::Value(value.into())
    }
}

impl<T: Into<FormatArg>> From<Option<T>> for FormatArg {
    fn from(value: Option<T>) -> Self {
        value.map_or(FormatArg::Undefined, Into::into)
    }
}

/// Format compat arguments into one message.
///
/// A string first argument is a template: `%s` string, `%d` number,
/// `%i` integer, `%f` float, `%j`/`%o`/`%O` JSON, `%c` consumes an argument
/// and prints nothing, `%%` is a literal percent. Directives without a
/// matching argument are kept verbatim and unused arguments are appended,
/// space separated. Any other first argument is rendered like the rest.
/// A lone string argument is returned untouched.
///
/// `%d` converts the whole value (`"12abc"` is `NaN`); `%i` and `%f` read
/// the longest numeric prefix of a string (`"12abc"` is `12`), and other
/// non-numbers give `NaN`. Numbers print in shortest form, with exponent
/// notation from `1e+21` upward and below `1e-6`.
pub fn format_message(args: &[FormatArg]) -> String {
    let Some((first, rest)) = args.split_first() else {
        return String::new();
    };

    let mut remaining = rest.iter();
    let mut out = match first {
        FormatArg::Value(Value::String(template)) if rest.is_empty() => template.clone(),
        FormatArg::Value(Value::String(template)) => apply_template(template, &mut remaining),
        other => render(other),
    };

    for arg in remaining {
        out.push(' ');
        out.push_str(&render(arg));
    }
    out
}

fn apply_template<'a>(template: &str, args: &mut impl Iterator<Item = &'a FormatArg>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(directive @ ('s' | 'd' | 'i' | 'f' | 'j' | 'o' | 'O' | 'c')) => {
                chars.next();
                match args.next() {
                    Some(arg) => out.push_str(&substitute(directive, arg)),
                    None => {
                        out.push('%');
                        out.push(directive);
                    }
                }
            }
            _ => out.push('%'),
        }
    }
    out
}

fn substitute(directive: char, arg: &FormatArg) -> String {
    match directive {
        's' => render(arg),
        'd' => number_text(arg),
        'i' => integer_text(arg),
        'f' => format_number(parse_float(arg)),
        'j' | 'o' | 'O' => json_text(arg),
        _ => String::new(),
    }
}

/// Plain rendering: strings verbatim, everything else as compact JSON.
fn render(arg: &FormatArg) -> String {
    match arg {
        FormatArg::Undefined => "undefined".to_string(),
        FormatArg::Value(Value::String(s)) => s.clone(),
        FormatArg::Value(Value::Number(_)) => number_text(arg),
        FormatArg::Value(value) => value.to_string(),
    }
}

fn json_text(arg: &FormatArg) -> String {
    match arg {
        FormatArg::Undefined => "undefined".to_string(),
        FormatArg::Value(value) => value.to_string(),
    }
}

fn number_text(arg: &FormatArg) -> String {
    if let FormatArg::Value(Value::Number(n)) = arg {
        if n.is_i64() || n.is_u64() {
            return n.to_string();
        }
    }
    format_number(to_number(arg))
}

fn integer_text(arg: &FormatArg) -> String {
    match arg {
        FormatArg::Value(Value::Number(n)) if n.is_i64() || n.is_u64() => n.to_string(),
        FormatArg::Value(Value::Number(n)) => {
            format_number(n.as_f64().map_or(f64::NAN, f64::trunc))
        }
        FormatArg::Value(Value::String(s)) => format_number(int_prefix(s)),
        _ => "NaN".to_string(),
    }
}

fn parse_float(arg: &FormatArg) -> f64 {
    match arg {
        FormatArg::Value(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        FormatArg::Value(Value::String(s)) => float_prefix(s),
        _ => f64::NAN,
    }
}

/// Optional sign followed by decimal digits, after leading whitespace.
fn int_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let unsigned = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    let digits = unsigned.len() - unsigned.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return f64::NAN;
    }
    let end = s.len() - unsigned.len() + digits;
    s[..end].parse().unwrap_or(f64::NAN)
}

/// Longest prefix shaped like `[sign]digits[.digits][e[sign]digits]`, or `Infinity`.
fn float_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };
    let mut mantissa = digits_from(end);
    end += mantissa;
    if bytes.get(end) == Some(&b'.') {
        let fraction = digits_from(end + 1);
        if mantissa + fraction > 0 {
            end += 1 + fraction;
            mantissa += fraction;
        }
    }
    if mantissa == 0 {
        return f64::NAN;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits_from(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    s[..end].parse().unwrap_or(f64::NAN)
}

fn to_number(arg: &FormatArg) -> f64 {
    match arg {
        FormatArg::Undefined => f64::NAN,
        FormatArg::Value(Value::Null) => 0.0,
        FormatArg::Value(Value::Bool(b)) => f64::from(u8::from(*b)),
        FormatArg::Value(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        FormatArg::Value(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse().unwrap_or(f64::NAN)
            }
        }
        FormatArg::Value(_) => f64::NAN,
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n.abs() >= 1e21 || (n != 0.0 && n.abs() < 1e-6) {
        let text = format!("{n:e}");
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        }
    } else if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}
