/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Width and height of an international draughts board.
pub const DEFAULT_SIZE: u8 = 10;

/// FEN of the starting setup on an international board.
pub const FEN_STARTPOS: &str = "W:W31-50:B1-20";

/// Parses a line made only of position numbers, such as `32 28` or `28x19x10`.
///
/// Returns `None` if anything other than numbers and the separators ` `, `-`, `x` and `,` appears.
///
/// # Example
/// ```
/// # use draughts::parse_numbers;
/// assert_eq!(parse_numbers("28x19x10"), Some(vec![28, 19, 10]));
/// assert_eq!(parse_numbers("32 - 28"), Some(vec![32, 28]));
/// assert_eq!(parse_numbers("moves"), None);
/// ```
pub fn parse_numbers(line: &str) -> Option<Vec<u16>> {
    let numbers = line
        .split(|c: char| c.is_ascii_whitespace() || matches!(c, '-' | 'x' | 'X' | ','))
        .filter(|token| !token.is_empty())
        .map(|token| token.parse().ok())
        .collect::<Option<Vec<u16>>>()?;

    (!numbers.is_empty()).then_some(numbers)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_numbers("32 28"), Some(vec![32, 28]));
        assert_eq!(parse_numbers("  7-1 "), Some(vec![7, 1]));
        assert_eq!(parse_numbers(""), None);
        assert_eq!(parse_numbers("32 a"), None);
    }
}
