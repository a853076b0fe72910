// src/extract/row.rs

/// Turns one data row's cell texts into a `label -> value` entry.
/// `None` skips the row.
pub trait RowMapper: Send + Sync {
    fn map_row(&self, cells: &[String]) -> Option<(String, String)>;
}

impl<F> RowMapper for F
where
    F: Fn(&[String]) -> Option<(String, String)> + Send + Sync,
{
    fn map_row(&self, cells: &[String]) -> Option<(String, String)> {
        self(cells)
    }
}

/// Label from one column, price from another with separators removed.
#[derive(Debug, Clone)]
pub struct LabelPriceColumns {
    pub label_column: usize,
    pub price_column: usize,
    pub strip_chars: Vec<char>,
}

impl Default for LabelPriceColumns {
    fn default() -> Self {
        Self {
            label_column: 0,
            price_column: 1,
            strip_chars: vec!['.', ','],
        }
    }
}

impl RowMapper for LabelPriceColumns {
    fn map_row(&self, cells: &[String]) -> Option<(String, String)> {
        let label = cells.get(self.label_column)?;
        let price = cells.get(self.price_column)?;
        let price: String = price
            .chars()
            .filter(|c| !self.strip_chars.contains(c))
            .collect();
        Some((label.clone(), price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_strips_thousand_separators() {
        let m = LabelPriceColumns::default();
        assert_eq!(
            m.map_row(&cells(&["Xăng RON 95-III", "23.450"])),
            Some(("Xăng RON 95-III".to_string(), "23450".to_string()))
        );
        assert_eq!(
            m.map_row(&cells(&["Dầu KO", "1,234.5"])),
            Some(("Dầu KO".to_string(), "12345".to_string()))
        );
    }

    #[test]
    fn test_short_row_is_skipped() {
        let m = LabelPriceColumns::default();
        assert_eq!(m.map_row(&cells(&["only one"])), None);
        assert_eq!(m.map_row(&[]), None);
    }

    #[test]
    fn test_custom_columns() {
        let m = LabelPriceColumns {
            label_column: 1,
            price_column: 3,
            strip_chars: vec!['.'],
        };
        assert_eq!(m.map_row(&cells(&["1", "E5", "x", "21.000"])).unwrap().1, "21000");
        assert_eq!(m.map_row(&cells(&["1", "E5", "x"])), None);
    }

    #[test]
    fn test_closure_mapper() {
        let upper = |c: &[String]| Some((c.first()?.to_uppercase(), c.last()?.clone()));
        assert_eq!(
            upper.map_row(&cells(&["ko", "18000"])),
            Some(("KO".to_string(), "18000".to_string()))
        );
    }
}
