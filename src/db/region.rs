//! Genomic regions and positions as given in URL path segments.

use std::str::FromStr;

use super::model::Located;

/// Error when parsing a region or position descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty region descriptor")]
    Empty,
    #[error("invalid coordinate in '{0}'")]
    Coordinate(String),
    #[error("start greater than end in '{0}'")]
    Inverted(String),
}

/// A chromosome with an optional coordinate range.
///
/// Written as `chr`, `chr:pos` or `chr:start-end`, coordinates 1-based and
/// inclusive.  A chromosome alone covers the whole chromosome.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
}

impl Region {
    pub fn new(chromosome: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chromosome: chromosome.into(),
            start,
            end,
        }
    }

    /// Region covering a whole chromosome.
    pub fn whole(chromosome: impl Into<String>) -> Self {
        Self::new(chromosome, 1, u64::MAX)
    }

    /// Whether the region covers the whole chromosome.
    pub fn is_whole(&self) -> bool {
        self.start <= 1 && self.end == u64::MAX
    }

    /// Whether a located feature overlaps this region.
    pub fn overlaps<T: Located + ?Sized>(&self, feature: &T) -> bool {
        feature.chromosome() == self.chromosome
            && feature.start() <= self.end
            && feature.end() >= self.start
    }

    /// Parse a comma separated list of regions.
    pub fn parse_list(value: &str) -> Result<Vec<Self>, ParseError> {
        value.split(',').map(str::parse).collect()
    }
}

impl FromStr for Region {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let coordinate = |value: &str| {
            value
                .trim()
                .replace('_', "")
                .parse::<u64>()
                .map_err(|_| ParseError::Coordinate(s.to_string()))
        };

        let (chromosome, range) = match s.split_once(':') {
            Some((chromosome, range)) => (chromosome.trim(), Some(range)),
            None => (s, None),
        };
        if chromosome.is_empty() {
            return Err(ParseError::Empty);
        }

        match range {
            None => Ok(Self::whole(chromosome)),
            Some(range) => {
                let (start, end) = match range.split_once('-') {
                    Some((start, end)) => (coordinate(start)?, coordinate(end)?),
                    None => {
                        let pos = coordinate(range)?;
                        (pos, pos)
                    }
                };
                if start > end {
                    return Err(ParseError::Inverted(s.to_string()));
                }
                Ok(Self::new(chromosome, start, end))
            }
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.chromosome)
        } else {
            write!(f, "{}:{}-{}", self.chromosome, self.start, self.end)
        }
    }
}

impl From<&Position> for Region {
    fn from(position: &Position) -> Self {
        Self::new(&position.chromosome, position.position, position.position)
    }
}

/// A single position on a chromosome, written as `chr:pos`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub chromosome: String,
    pub position: u64,
}

impl Position {
    /// Parse a comma separated list of positions.
    pub fn parse_list(value: &str) -> Result<Vec<Self>, ParseError> {
        value.split(',').map(str::parse).collect()
    }
}

impl FromStr for Position {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (chromosome, position) = s
            .split_once(':')
            .ok_or_else(|| ParseError::Coordinate(s.to_string()))?;
        if chromosome.trim().is_empty() {
            return Err(ParseError::Empty);
        }
        let position = position
            .trim()
            .parse::<u64>()
            .map_err(|_| ParseError::Coordinate(s.to_string()))?;
        Ok(Self {
            chromosome: chromosome.trim().to_string(),
            position,
        })
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.chromosome, self.position)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[rstest::rstest]
    #[case("13", Region::whole("13"))]
    #[case("13:32889611-32973805", Region::new("13", 32889611, 32973805))]
    #[case("X:1_000-2_000", Region::new("X", 1000, 2000))]
    #[case(" 1:100 ", Region::new("1", 100, 100))]
    fn parse_region(#[case] value: &str, #[case] expected: Region) -> Result<(), anyhow::Error> {
        assert_eq!(value.parse::<Region>()?, expected);

        Ok(())
    }

    #[rstest::rstest]
    #[case("", ParseError::Empty)]
    #[case(":1-2", ParseError::Empty)]
    #[case("1:a-2", ParseError::Coordinate("1:a-2".into()))]
    #[case("1:5-2", ParseError::Inverted("1:5-2".into()))]
    fn parse_region_fails(#[case] value: &str, #[case] expected: ParseError) {
        assert_eq!(value.parse::<Region>(), Err(expected));
    }

    #[test]
    fn parse_region_list() -> Result<(), anyhow::Error> {
        let regions = Region::parse_list("1:10-20,2")?;
        assert_eq!(regions, vec![Region::new("1", 10, 20), Region::whole("2")]);

        Ok(())
    }

    #[test]
    fn region_display() {
        assert_eq!(Region::whole("MT").to_string(), "MT");
        assert_eq!(Region::new("1", 10, 20).to_string(), "1:10-20");
    }

    #[test]
    fn overlaps() {
        let region = Region::new("1", 100, 200);
        let inside = crate::db::model::Exon {
            chromosome: "1".into(),
            start: 150,
            end: 250,
            ..Default::default()
        };
        let outside = crate::db::model::Exon {
            chromosome: "1".into(),
            start: 201,
            end: 250,
            ..Default::default()
        };
        let other_chrom = crate::db::model::Exon {
            chromosome: "2".into(),
            start: 150,
            end: 160,
            ..Default::default()
        };

        assert!(region.overlaps(&inside));
        assert!(!region.overlaps(&outside));
        assert!(!region.overlaps(&other_chrom));
        assert!(Region::whole("2").overlaps(&other_chrom));
    }

    #[test]
    fn parse_position_list() -> Result<(), anyhow::Error> {
        let positions = Position::parse_list("1:100,X:5")?;
        assert_eq!(
            positions,
            vec![
                Position {
                    chromosome: "1".into(),
                    position: 100
                },
                Position {
                    chromosome: "X".into(),
                    position: 5
                },
            ]
        );
        assert_eq!(Region::from(&positions[0]), Region::new("1", 100, 100));

        Ok(())
    }

    #[rstest::rstest]
    #[case("1")]
    #[case("1:x")]
    #[case(":5")]
    fn parse_position_fails(#[case] value: &str) {
        assert!(value.parse::<Position>().is_err());
    }
}
