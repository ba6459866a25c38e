use unicode_segmentation::UnicodeSegmentation;

/// One word token with both byte and char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
	pub text: &'a str,
	pub byte_start: usize,
	pub byte_end: usize,
	pub start: usize,
	pub end: usize,
}

/// Splits `text` into UAX #29 words, tracking char offsets incrementally.
pub(crate) fn words(text: &str) -> Vec<Token<'_>> {
	let mut out = Vec::new();
	let mut last_byte = 0;
	let mut last_char = 0;
	for (byte_start, word) in text.unicode_word_indices() {
		last_char += text[last_byte..byte_start].chars().count();
		let len = word.chars().count();
		out.push(Token {
			text: word,
			byte_start,
			byte_end: byte_start + word.len(),
			start: last_char,
			end: last_char + len,
		});
		last_byte = byte_start + word.len();
		last_char += len;
	}
	out
}

/// Text between two consecutive tokens.
pub(crate) fn gap<'a>(text: &'a str, left: &Token<'_>, right: &Token<'_>) -> &'a str {
	&text[left.byte_end..right.byte_start]
}

/// True when `gap` is non-empty and holds only spaces or tabs.
pub(crate) fn is_inline_gap(gap: &str) -> bool {
	!gap.is_empty() && gap.chars().all(|c| c == ' ' || c == '\t')
}

/// Re-cases `word` to follow the shape of `like`.
pub(crate) fn match_case(word: &str, like: &str) -> String {
	let letters: Vec<char> = like.chars().filter(|c| c.is_alphabetic()).collect();
	if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
		return word.to_uppercase();
	}
	if letters.first().is_some_and(|c| c.is_uppercase()) {
		return capitalize(word);
	}
	word.to_string()
}

/// Uppercases the first char of `word`.
pub(crate) fn capitalize(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}
