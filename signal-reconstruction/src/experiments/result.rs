use super::ExperimentError;
use indexmap::IndexMap;
use pulse_recon_common::Real;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::ser::PrettyFormatter;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};
use tracing::{info, instrument};

/// Magnitudes in this range are keyed in positional notation, all others in
/// scientific notation with a signed exponent of at least two digits,
/// e.g. `0.05`, `1.0`, `1e-05` or `1e+16`.
const POSITIONAL_KEY_RANGE: std::ops::Range<Real> = 1e-4..1e16;

/// Key under which a noise level is recorded.
pub fn sigma_key(sigma: Real) -> String {
    let magnitude = sigma.abs();
    if !sigma.is_finite() {
        sigma.to_string()
    } else if magnitude != 0.0 && !POSITIONAL_KEY_RANGE.contains(&magnitude) {
        let scientific = format!("{sigma:e}");
        match scientific.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => scientific,
        }
    } else if sigma.fract() == 0.0 {
        format!("{sigma:.1}")
    } else {
        sigma.to_string()
    }
}

/// Key under which an event count is recorded.
pub fn count_key(count: usize) -> String {
    count.to_string()
}

/// Results of a study keyed by the swept parameter.
///
/// Entries keep the order in which the sweep visited them, both in memory
/// and when persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperimentResult<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for ExperimentResult<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> ExperimentResult<T> {
    /// A repeated key replaces the earlier value but keeps its position.
    pub(crate) fn insert(&mut self, key: String, value: T) {
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Serialize> ExperimentResult<T> {
    /// Writes the result as indented JSON, replacing any existing file.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn save(&self, path: &Path) -> Result<(), ExperimentError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        let mut serializer =
            serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)?;
        serializer.into_inner().flush()?;
        info!("Results written to {}", path.display());
        Ok(())
    }
}

impl<T: DeserializeOwned> ExperimentResult<T> {
    pub fn load(path: &Path) -> Result<Self, ExperimentError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn keys_match_sweep_values() {
        assert_eq!(sigma_key(0.05), "0.05");
        assert_eq!(sigma_key(0.1), "0.1");
        assert_eq!(sigma_key(0.5), "0.5");
        assert_eq!(sigma_key(1.0), "1.0");
        assert_eq!(sigma_key(0.0), "0.0");
        assert_eq!(count_key(10000), "10000");
    }

    #[test]
    fn extreme_sigma_keys() {
        assert_eq!(sigma_key(1e-4), "0.0001");
        assert_eq!(sigma_key(1e-5), "1e-05");
        assert_eq!(sigma_key(2.5e-7), "2.5e-07");
        assert_eq!(sigma_key(1e15), "1000000000000000.0");
        assert_eq!(sigma_key(1e16), "1e+16");
        assert_eq!(sigma_key(1.5e200), "1.5e+200");
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut result = ExperimentResult::default();
        result.insert(count_key(10000), 3);
        result.insert(count_key(200), 2);
        result.insert(count_key(100), 1);
        result.insert(count_key(200), 4);

        assert_eq!(result.len(), 3);
        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["10000", "200", "100"]);
        assert_eq!(result.get("200"), Some(&4));
        assert_eq!(result.get("300"), None);

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"10000":3,"200":4,"100":1}"#);
        let read: ExperimentResult<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(read.keys().collect::<Vec<_>>(), vec!["10000", "200", "100"]);
        assert_eq!(read, result);
    }

    #[test]
    fn save_and_load() {
        let dir = std::env::temp_dir().join("signal-reconstruction-result-save-and-load");
        let path = dir.join("nested").join("result.json");
        let mut result = ExperimentResult::default();
        result.insert(sigma_key(0.2), vec![1.5, -0.5]);
        result.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n    \"0.2\": ["));
        assert_eq!(ExperimentResult::<Vec<Real>>::load(&path).unwrap(), result);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn saved_floats_load_bit_exact() {
        let dir = std::env::temp_dir().join("signal-reconstruction-result-float-bits");
        let path = dir.join("result.json");
        let mut rng = StdRng::seed_from_u64(11);
        let mut values: Vec<Real> = (0..5000).map(|_| rng.random_range(-1.0..1.0)).collect();
        values.extend(
            std::iter::repeat_with(|| Real::from_bits(rng.random::<u64>()))
                .filter(|value| value.is_finite())
                .take(5000),
        );
        values.push(0.011355352869082088);

        let mut result = ExperimentResult::default();
        result.insert(count_key(values.len()), values.clone());
        result.save(&path).unwrap();

        let loaded = ExperimentResult::<Vec<Real>>::load(&path).unwrap();
        let loaded = loaded.get(&count_key(values.len())).unwrap();
        assert_eq!(loaded.len(), values.len());
        for (written, read) in values.iter().zip(loaded) {
            assert_eq!(written.to_bits(), read.to_bits(), "{written} read as {read}");
        }
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn load_missing_file() {
        let path = std::env::temp_dir().join("signal-reconstruction-no-such-result.json");
        assert!(matches!(
            ExperimentResult::<Real>::load(&path),
            Err(ExperimentError::IO(_))
        ));
    }
}
