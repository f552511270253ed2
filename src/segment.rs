/// Returns the trimmed text between `start_marker` and the first end marker
/// that follows it.
///
/// End markers are tried in priority order, so a page carrying both the
/// value-in-words line and the page footer is cut at the former. Markers are
/// matched literally and the segment may span any number of lines.
pub(crate) fn locate_segment<'a, S>(
    page_text: &'a str,
    start_marker: &str,
    end_markers: &[S],
) -> Option<&'a str>
where
    S: AsRef<str>,
{
    let start = page_text.find(start_marker)? + start_marker.len();
    let body = &page_text[start..];

    end_markers
        .iter()
        .find_map(|marker| body.find(marker.as_ref()))
        .map(|end| body[..end].trim())
        .filter(|segment| !segment.is_empty())
}
