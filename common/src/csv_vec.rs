use std::{fmt::Display, ops::Deref, str::FromStr};

/// Comma separated list of values, for use as a [clap] argument.
#[derive(Clone, Debug, PartialEq)]
pub struct CSVVec<T>(Vec<T>);

impl<T> CSVVec<T> {
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> From<Vec<T>> for CSVVec<T> {
    fn from(value: Vec<T>) -> Self {
        Self(value)
    }
}

impl<T> Deref for CSVVec<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> FromStr for CSVVec<T>
where
    T: FromStr,
{
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .map(T::from_str)
            .collect::<Result<_, _>>()
            .map(Self)
    }
}

impl<T> Display for CSVVec<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .iter()
                .map(T::to_string)
                .collect::<Vec<_>>()
                .join(",")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_floats() {
        let list: CSVVec<f64> = "0.05, 0.1,0.2".parse().unwrap();
        assert_eq!(list.into_inner(), vec![0.05, 0.1, 0.2]);
    }

    #[test]
    fn parse_invalid() {
        assert!("100,ten".parse::<CSVVec<usize>>().is_err());
    }

    #[test]
    fn display_round_trip() {
        let list = CSVVec::from(vec![100usize, 1000, 10000]);
        assert_eq!(list.to_string(), "100,1000,10000");
        assert_eq!(list.len(), 3);
    }
}
