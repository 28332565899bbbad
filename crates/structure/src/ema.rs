use trade_core::types::Price;

/// Recursive EMA, alpha = 2 / (span + 1).
///
/// Seeded with the first sample (no SMA warmup), so every update yields a value.
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    value: Option<f64>,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        let p = span.max(1) as f64;
        Self {
            alpha: 2.0 / (p + 1.0),
            value: None,
        }
    }

    pub fn update(&mut self, x: f64) -> f64 {
        match self.value {
            Some(v) => {
                let next = self.alpha * x + (1.0 - self.alpha) * v;
                self.value = Some(next);
                next
            }
            None => {
                self.value = Some(x);
                x
            }
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

/// EMA of the whole series, evaluated at the last sample
pub fn ema_last<I>(prices: I, span: usize) -> Option<Price>
where
    I: IntoIterator<Item = Price>,
{
    let mut ema = Ema::new(span);
    for p in prices {
        ema.update(p.0);
    }
    ema.value().map(Price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_has_no_value() {
        assert_eq!(ema_last(Vec::<Price>::new(), 20), None);
    }

    #[test]
    fn constant_series_stays_constant() {
        let prices = vec![Price(42.0); 50];
        let v = ema_last(prices, 20).unwrap();
        assert!((v.0 - 42.0).abs() < 1e-12);
    }

    #[test]
    fn follows_recursive_formula() {
        // span 3 -> alpha 0.5
        let v = ema_last([Price(10.0), Price(20.0), Price(30.0)], 3).unwrap();
        // 10 -> 15 -> 22.5
        assert!((v.0 - 22.5).abs() < 1e-12);
    }

    #[test]
    fn zero_span_is_treated_as_one() {
        let v = ema_last([Price(1.0), Price(7.0)], 0).unwrap();
        assert!((v.0 - 7.0).abs() < 1e-12);
    }
}
