use proc_macro2::TokenStream;

/// Format a sequence of items the way they will be written to disk.
pub fn format_file(tokens: TokenStream) -> syn::Result<String> {
    let parsed = syn::parse_file(&tokens.to_string())?;
    Ok(prettyplease::unparse(&parsed))
}

#[cfg(test)]
pub fn assert_tokens_eq(left: TokenStream, right: TokenStream) {
    let left = format_file(left).unwrap();
    let right = format_file(right).unwrap();
    similar_asserts::assert_eq!(left, right);
}
