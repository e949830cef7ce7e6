use crate::context::{CONFIG_FILE_NAME, Workspace};
use crate::prompt::DEFAULT_PREAMBLE;
use tempfile::TempDir;

/// Temporary workspace, optionally with an `aladin.yaml`.
pub(crate) fn create_test_workspace(config_yaml: Option<&str>) -> (TempDir, Workspace) {
    let temp_dir = TempDir::new().unwrap();
    if let Some(yaml) = config_yaml {
        std::fs::write(temp_dir.path().join(CONFIG_FILE_NAME), yaml).unwrap();
    }
    let ws = Workspace::resolve_from(temp_dir.path()).unwrap();
    (temp_dir, ws)
}

/// A well-formed reply, preamble included, whose body has exactly `words` words.
pub(crate) fn sample_reply(words: usize) -> String {
    let body = (1..=words)
        .map(|i| if i % 12 == 0 { "cats\n" } else { "cats " })
        .collect::<String>();

    format!(
        "{preamble}\n\n\
         ###SEO_TITLE###\n\
         Feline Care: A Guide\n\
         ###SEO_DESCRIPTION###\n\
         Everything about feline care for new cat owners.\n\
         ###EMOTIONAL_TITLE###\n\
         Love Your Cat Better\n\
         ###EMOTIONAL_DESCRIPTION###\n\
         Small habits that make your cat feel at home.\n\
         ###URL_SLUG###\n\
         feline-care-guide\n\
         ###BLOG_CONTENT###\n\
         {body}\n",
        preamble = DEFAULT_PREAMBLE,
        body = body.trim_end()
    )
}

#[test]
fn sample_reply_body_has_requested_words() {
    let reply = sample_reply(37);
    let body = reply.split("###BLOG_CONTENT###").nth(1).unwrap();
    assert_eq!(body.split_whitespace().count(), 37);
}
