//! FFmpeg filter and concat-list builders.

use std::path::Path;

use vforge_models::CropParams;

/// Characters with meaning inside a filter option value.
const OPTION_SPECIAL: &[char] = &['\\', '\'', ':'];
/// Characters with meaning inside a filtergraph description.
const GRAPH_SPECIAL: &[char] = &['\\', '\'', '[', ']', ',', ';'];

/// Rectangular crop filter: `crop=w:h:x:y`.
pub fn crop_filter(params: &CropParams) -> String {
    format!("crop={}:{}:{}:{}", params.w, params.h, params.x, params.y)
}

/// Subtitle burn-in filter for the file at `path`.
///
/// The path is escaped for both filter levels so it survives `-vf` intact.
pub fn subtitles_filter(path: &Path) -> String {
    format!(
        "subtitles=filename={}",
        escape_filter_value(&path.to_string_lossy())
    )
}

/// Escape a value for use as a filter option inside a filtergraph.
pub fn escape_filter_value(value: &str) -> String {
    escape(&escape(value, OPTION_SPECIAL), GRAPH_SPECIAL)
}

fn escape(value: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Content of a concat-demuxer list file.
pub fn concat_list<P: AsRef<Path>>(inputs: &[P]) -> String {
    inputs
        .iter()
        .map(|p| {
            let path = p.as_ref().to_string_lossy().replace('\'', "'\\''");
            format!("file '{}'", path)
        })
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_crop_filter() {
        assert_eq!(crop_filter(&CropParams::default()), "crop=1080:1920:0:0");
    }

    #[test]
    fn test_subtitles_filter_plain_path() {
        let filter = subtitles_filter(Path::new("/srv/scratch/uploads/abc.srt"));
        assert_eq!(filter, "subtitles=filename=/srv/scratch/uploads/abc.srt");
    }

    #[test]
    fn test_subtitles_filter_escapes_special_characters() {
        let filter = subtitles_filter(Path::new("/tmp/a:b/it's.srt"));
        assert_eq!(filter, "subtitles=filename=/tmp/a\\\\:b/it\\\\\\'s.srt");
    }

    #[test]
    fn test_concat_list() {
        let list = concat_list(&[PathBuf::from("/s/one.mp4"), PathBuf::from("/s/it's.mp4")]);
        assert_eq!(list, "file '/s/one.mp4'\nfile '/s/it'\\''s.mp4'\n");
    }
}
