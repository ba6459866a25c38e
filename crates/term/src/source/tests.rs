use pretty_assertions::assert_eq;
use quill_editor::{BlockKind, LintSurface};
use rstest::rstest;

use super::*;

const ANSWER: &str = "# Question 1\n\nPhotosynthesis  makes\n  sugar wrold.\n\nCaf\u{00E9} ok\n";

fn at(line: usize, column: usize) -> Location {
	Location { line, column }
}

#[test]
fn paragraphs_join_lines_and_headings_stand_alone() {
	let source = SourceText::parse(ANSWER);
	let doc = source.document();
	assert_eq!(doc.plain_text(), "Question 1\nPhotosynthesis  makes sugar wrold.\nCaf\u{00E9} ok");
	let kinds: Vec<BlockKind> = doc.blocks().iter().map(Block::kind).collect();
	assert_eq!(kinds, vec![BlockKind::Heading(1), BlockKind::Paragraph, BlockKind::Paragraph]);
}

#[rstest]
#[case::heading_text(0, at(1, 3))]
#[case::heading_end(9, at(1, 12))]
#[case::first_line(11, at(3, 1))]
#[case::indented_continuation(39, at(4, 9))]
#[case::after_multibyte(51, at(6, 6))]
fn offsets_map_back_to_lines(#[case] offset: usize, #[case] expected: Location) {
	assert_eq!(SourceText::parse(ANSWER).locate(offset), expected);
}

#[test]
fn empty_file_still_makes_a_document() {
	let source = SourceText::parse("");
	assert_eq!(source.document().plain_text(), "");
	assert_eq!(source.locate(0), at(1, 1));
}

#[rstest]
#[case::no_space("#hashtag")]
#[case::too_deep("####### seven")]
fn hash_lines_that_are_not_headings(#[case] line: &str) {
	let doc = SourceText::parse(line).document();
	assert_eq!(doc.blocks()[0].kind(), BlockKind::Paragraph);
	assert_eq!(doc.plain_text(), line);
}

#[test]
fn heading_ends_the_open_paragraph() {
	let doc = SourceText::parse("intro line\n## Part b\nanswer").document();
	assert_eq!(doc.plain_text(), "intro line\nPart b\nanswer");
	assert_eq!(doc.blocks()[1].kind(), BlockKind::Heading(2));
}
