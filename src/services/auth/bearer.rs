//! `Authorization: Bearer <token>` header parsing.

use super::AuthError;

const SCHEME: &str = "bearer ";

/// Pull the token out of a raw `Authorization` header value.
///
/// The scheme is matched case-insensitively. The token is the first
/// space-delimited field after the scheme, so `"Bearer a b"` yields `"a"` and
/// `"Bearer  a"` (empty first field) is rejected.
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header
        .filter(|h| !h.is_empty())
        .ok_or(AuthError::MissingHeader)?;

    let scheme = header.get(..SCHEME.len()).ok_or(AuthError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case(SCHEME) {
        return Err(AuthError::MalformedHeader);
    }

    header[SCHEME.len()..]
        .split(' ')
        .next()
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MalformedHeader)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Bearer abc.def.ghi", "abc.def.ghi")]
    #[case("bearer abc.def.ghi", "abc.def.ghi")]
    #[case("BEARER abc.def.ghi", "abc.def.ghi")]
    #[case("Bearer abc.def.ghi trailing", "abc.def.ghi")]
    fn returns_token_after_scheme(#[case] header: &str, #[case] expected: &str) {
        assert_eq!(extract_bearer_token(Some(header)), Ok(expected));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    fn absent_header_is_missing(#[case] header: Option<&str>) {
        assert_eq!(
            extract_bearer_token(header),
            Err(AuthError::MissingHeader)
        );
    }

    #[rstest]
    #[case("Basic dXNlcjpwYXNz")]
    #[case("Bearer")]
    #[case("Bearer ")]
    #[case("Bearer  abc")]
    #[case("Bearerabc.def.ghi")]
    #[case("Token abc.def.ghi")]
    #[case("abc.def.ghi")]
    #[case("Beärer abc")]
    fn non_bearer_values_are_malformed(#[case] header: &str) {
        assert_eq!(
            extract_bearer_token(Some(header)),
            Err(AuthError::MalformedHeader)
        );
    }
}
