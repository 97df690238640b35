//! Built-in functions and named constants.
//!
//! Names follow numpy where one exists (`arctan2`, `minimum`, ...), with the
//! shorter C-style spellings accepted as aliases.

/// A built-in function, classified by how it maps its arguments
#[derive(Debug, Clone, Copy)]
pub enum Function {
    /// Elementwise over one argument
    Unary(fn(f64) -> f64),
    /// Elementwise over two arguments, with broadcasting
    Binary(fn(f64, f64) -> f64),
    /// Collapses one argument to a scalar
    Reduce(fn(&[f64]) -> f64),
}

impl Function {
    /// Number of arguments the function takes
    pub fn arity(&self) -> usize {
        match self {
            Function::Unary(_) | Function::Reduce(_) => 1,
            Function::Binary(_) => 2,
        }
    }
}

/// Look up a built-in function by name
pub fn lookup_function(name: &str) -> Option<Function> {
    use Function::*;

    let f = match name {
        "abs" | "absolute" => Unary(f64::abs),
        "sqrt" => Unary(f64::sqrt),
        "exp" => Unary(f64::exp),
        "log" => Unary(f64::ln),
        "log10" => Unary(f64::log10),
        "log2" => Unary(f64::log2),
        "sin" => Unary(f64::sin),
        "cos" => Unary(f64::cos),
        "tan" => Unary(f64::tan),
        "asin" | "arcsin" => Unary(f64::asin),
        "acos" | "arccos" => Unary(f64::acos),
        "atan" | "arctan" => Unary(f64::atan),
        "sinh" => Unary(f64::sinh),
        "cosh" => Unary(f64::cosh),
        "tanh" => Unary(f64::tanh),
        "floor" => Unary(f64::floor),
        "ceil" => Unary(f64::ceil),
        "round" => Unary(round_half_even),
        "sign" => Unary(sign),
        "power" => Binary(f64::powf),
        "atan2" | "arctan2" => Binary(f64::atan2),
        "hypot" => Binary(f64::hypot),
        "minimum" => Binary(minimum),
        "maximum" => Binary(maximum),
        "mean" => Reduce(mean),
        "sum" => Reduce(sum),
        "min" => Reduce(min),
        "max" => Reduce(max),
        "std" => Reduce(std),
        _ => return None,
    };
    Some(f)
}

/// Look up a named constant
pub fn lookup_constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        "tau" => Some(std::f64::consts::TAU),
        "inf" => Some(f64::INFINITY),
        "nan" => Some(f64::NAN),
        _ => None,
    }
}

/// Round to nearest, ties to even
fn round_half_even(x: f64) -> f64 {
    let r = x.round();
    if (x - x.trunc()).abs() == 0.5 {
        2.0 * (x / 2.0).round()
    } else {
        r
    }
}

fn sign(x: f64) -> f64 {
    if x.is_nan() || x == 0.0 {
        x
    } else {
        x.signum()
    }
}

// NaN-propagating, unlike f64::min/max
fn minimum(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn maximum(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

fn mean(values: &[f64]) -> f64 {
    sum(values) / values.len() as f64
}

fn min(values: &[f64]) -> f64 {
    values.iter().copied().reduce(minimum).unwrap_or(f64::NAN)
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(maximum).unwrap_or(f64::NAN)
}

/// Population standard deviation
fn std(values: &[f64]) -> f64 {
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(0.5), 0.0);
        assert_eq!(round_half_even(1.5), 2.0);
        assert_eq!(round_half_even(2.5), 2.0);
        assert_eq!(round_half_even(-2.5), -2.0);
        assert_eq!(round_half_even(2.6), 3.0);
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign(-3.0), -1.0);
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(7.5), 1.0);
        assert!(sign(f64::NAN).is_nan());
    }

    #[test]
    fn test_reductions() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&v), 5.0);
        assert_eq!(std(&v), 2.0);
        assert_eq!(min(&v), 2.0);
        assert_eq!(max(&v), 9.0);
        assert!(min(&[1.0, f64::NAN]).is_nan());
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup_function("arctan2").map(|f| f.arity()), Some(2));
        assert_eq!(lookup_function("mean").map(|f| f.arity()), Some(1));
        assert!(lookup_function("eval").is_none());
        assert!(lookup_function("__import__").is_none());
        assert_eq!(lookup_constant("pi"), Some(std::f64::consts::PI));
        assert_eq!(lookup_constant("np"), None);
    }
}
