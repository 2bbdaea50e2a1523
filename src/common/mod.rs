//! Commonly used code.

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

pub mod config;

/// Commonly used command line arguments.
#[derive(Parser, Debug, Default)]
pub struct Args {
    /// Verbosity of the program
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

/// The version of `cellbase-ws` package.
#[cfg(not(test))]
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// This allows us to override the version to `0.0.0` in tests.
pub fn version() -> &'static str {
    #[cfg(test)]
    return "0.0.0";
    #[cfg(not(test))]
    return VERSION;
}

/// Split a comma separated list of identifiers from a path segment.
///
/// Surrounding whitespace is trimmed; empty entries are kept so that the
/// positions of the result match the positions of the input.
pub fn split_ids(query: &str) -> Vec<String> {
    query.split(',').map(|s| s.trim().to_string()).collect()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    #[test]
    fn version() {
        assert_eq!(super::version(), "0.0.0");
    }

    #[rstest::rstest]
    #[case("BRCA2", vec!["BRCA2"])]
    #[case("BRCA2,TP53", vec!["BRCA2", "TP53"])]
    #[case("BRCA2, TP53,", vec!["BRCA2", "TP53", ""])]
    fn split_ids(#[case] query: &str, #[case] expected: Vec<&str>) {
        assert_eq!(super::split_ids(query), expected);
    }
}
