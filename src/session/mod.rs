//! Interactive menu session driving the post store.
//!
//! An iterative dispatcher: read a menu choice, run the action, repeat until
//! the user quits or input ends. Failures inside an action are printed and the
//! menu comes back.
//!
//! CHANGELOG:
//! - 10/17/2026 - Insert message names the image file; compact JSON listings
//! - 10/17/2026 - Iterative dispatcher with injected I/O (replaces recursive menu)

pub mod menu;
pub mod prompt;

use crate::config::Settings;
use crate::db::posts;
use crate::display::ImageViewer;
use crate::error::PostError;
use crate::image::{self, ImageFile};
use crate::output;
use menu::{MenuChoice, MENU_TEXT};
use prompt::Prompter;
use rusqlite::Connection;
use std::io::{BufRead, Write};
use thiserror::Error;
use tracing::{debug, warn};

/// Why a session step stopped early.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Input stream reached EOF.
    #[error("input closed")]
    InputClosed,

    #[error("too many invalid attempts entering {0}")]
    TooManyAttempts(&'static str),

    /// Reading the keyboard or writing the screen failed.
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] PostError),
}

/// What the dispatcher does after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Session<'a, R, W> {
    conn: &'a Connection,
    viewer: &'a dyn ImageViewer,
    settings: Settings,
    prompt: Prompter<R, W>,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(
        conn: &'a Connection,
        viewer: &'a dyn ImageViewer,
        settings: Settings,
        input: R,
        out: W,
    ) -> Self {
        let prompt = Prompter::new(input, out, settings.max_attempts);
        Self {
            conn,
            viewer,
            settings,
            prompt,
        }
    }

    /// Select a user, then serve menu commands until exit or end of input.
    pub fn run(&mut self) -> Result<(), SessionError> {
        let user_id = match self.select_user() {
            Ok(user_id) => user_id,
            Err(SessionError::InputClosed) => return Ok(()),
            Err(e) => return Err(e),
        };
        debug!(%user_id, "session started");

        loop {
            self.prompt.say(MENU_TEXT)?;
            let line = match self.prompt.ask("> ") {
                Ok(line) => line,
                Err(SessionError::InputClosed) => return Ok(()),
                Err(e) => return Err(e),
            };

            let Some(choice) = MenuChoice::parse(&line) else {
                self.prompt.say("Invalid input, please try again.")?;
                continue;
            };

            match self.dispatch(&user_id, choice) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => {
                    self.prompt.say("Exiting...")?;
                    return Ok(());
                }
                Err(SessionError::InputClosed) => return Ok(()),
                Err(SessionError::Terminal(e)) => return Err(SessionError::Terminal(e)),
                Err(e) => {
                    warn!(%user_id, ?choice, error = %e, "action failed");
                    self.prompt.say(&format!("Error: {}", e))?;
                }
            }
        }
    }

    fn dispatch(&mut self, user_id: &str, choice: MenuChoice) -> Result<Flow, SessionError> {
        match choice {
            MenuChoice::ListAll => self.list_all(user_id)?,
            MenuChoice::ViewOne => self.view_one(user_id)?,
            MenuChoice::Create => self.create(user_id)?,
            MenuChoice::Update => self.update(user_id)?,
            MenuChoice::Delete => self.delete(user_id)?,
            MenuChoice::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    // ========================================================================
    // User selection
    // ========================================================================

    fn select_user(&mut self) -> Result<String, SessionError> {
        let conn = self.conn;

        if let Some(user_id) = self.settings.user.clone() {
            if posts::user_exists(conn, &user_id)? {
                return Ok(user_id);
            }
            if self.settings.create_user {
                posts::ensure_user_table(conn, &user_id)?;
                self.prompt.say(&format!("Created user '{}'.", user_id))?;
                return Ok(user_id);
            }
            return Err(PostError::NotFound(format!("user '{}'", user_id)).into());
        }

        self.prompt.retry("user ID", |p| {
            let user_id = p.ask("Enter User ID: ")?.trim().to_string();
            if user_id.is_empty() {
                p.say("User ID cannot be empty.")?;
                return Ok(None);
            }
            if posts::user_exists(conn, &user_id)? {
                p.say("User exists")?;
                return Ok(Some(user_id));
            }

            p.say("User not found")?;
            let known = posts::list_users(conn)?;
            if !known.is_empty() {
                p.say(&format!("Known users: {}", known.join(", ")))?;
            }
            let answer = p.ask(&format!("Create a new user '{}'? (Y/N): ", user_id))?;
            if answer.trim().eq_ignore_ascii_case("y") {
                posts::ensure_user_table(conn, &user_id)?;
                p.say(&format!("Created user '{}'.", user_id))?;
                return Ok(Some(user_id));
            }
            Ok(None)
        })
    }

    // ========================================================================
    // Actions
    // ========================================================================

    fn list_all(&mut self, user_id: &str) -> Result<(), SessionError> {
        let all = posts::get_all(self.conn, user_id)?;
        if all.is_empty() {
            self.prompt.say("No posts yet.")?;
            return Ok(());
        }
        self.show_posts(&all)
    }

    fn view_one(&mut self, user_id: &str) -> Result<(), SessionError> {
        let post_id = self.ask_post_id()?;
        match posts::get(self.conn, user_id, post_id) {
            Ok(post) => self.show_posts(std::slice::from_ref(&post)),
            Err(e) if e.is_not_found() => self.prompt.say("Post not found, try again."),
            Err(e) => Err(e.into()),
        }
    }

    fn create(&mut self, user_id: &str) -> Result<(), SessionError> {
        let Some(image) = self.ask_image(false)? else {
            return Ok(());
        };
        let caption = self.ask_caption(false)?;

        let post_id = posts::insert(self.conn, user_id, &caption, &image.bytes)?;
        self.prompt.say(&format!(
            "Post inserted successfully (post ID {}, image {}).",
            post_id,
            image.path.display()
        ))
    }

    fn update(&mut self, user_id: &str) -> Result<(), SessionError> {
        self.prompt.say("To update an existing post:")?;
        let post_id = self.ask_post_id()?;
        if !posts::exists(self.conn, user_id, post_id)? {
            return self.prompt.say("Post not found, try again.");
        }
        self.prompt.say("Post found.")?;

        let image = self.ask_image(true)?;
        let caption = self.ask_caption(true)?;

        if image.is_none() && caption.is_empty() {
            return self.prompt.say("Nothing to update.");
        }
        posts::update(
            self.conn,
            user_id,
            post_id,
            Some(caption.as_str()),
            image.as_ref().map(|file| file.bytes.as_slice()),
        )?;
        self.prompt.say("Post updated successfully.")
    }

    fn delete(&mut self, user_id: &str) -> Result<(), SessionError> {
        self.prompt.say("To delete an existing post:")?;
        let post_id = self.ask_post_id()?;
        if !posts::exists(self.conn, user_id, post_id)? {
            return self.prompt.say("Post not found, try again.");
        }
        posts::delete(self.conn, user_id, post_id)?;
        self.prompt.say("Post deleted successfully.")
    }

    fn show_posts(&mut self, all: &[posts::Post]) -> Result<(), SessionError> {
        if self.settings.output.json {
            let rendered = output::posts_json(all, &self.settings.output);
            return self.prompt.say(&rendered);
        }

        for post in all {
            self.prompt.say(&output::format_post(post))?;
            if self.settings.display_images {
                if let Err(e) = self.viewer.show(&post.image) {
                    warn!(post_id = post.post_id, error = %e, "image display failed");
                    self.prompt.say(&format!("Error displaying image: {}", e))?;
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Input helpers
    // ========================================================================

    fn ask_post_id(&mut self) -> Result<i64, SessionError> {
        self.prompt.retry("post ID", |p| {
            let raw = p.ask("Enter your Post ID: ")?;
            match raw.trim().parse::<i64>() {
                Ok(id) => Ok(Some(id)),
                Err(_) => {
                    p.say("Post ID must be a number, try again.")?;
                    Ok(None)
                }
            }
        })
    }

    /// Prompt for an image path until a valid file is read.
    ///
    /// With `keep_current`, a blank path returns `None` (leave image as is).
    fn ask_image(&mut self, keep_current: bool) -> Result<Option<ImageFile>, SessionError> {
        self.prompt
            .say("Only images with '.png' or '.jpg' extension are supported.")?;
        let prompt_text = if keep_current {
            "Enter the file path of the new image (blank keeps the current one): "
        } else {
            "Please enter the file path of the image to be posted: "
        };

        self.prompt.retry("image path", |p| {
            let raw = p.ask(prompt_text)?;
            let path = raw.trim();
            if path.is_empty() {
                if keep_current {
                    return Ok(Some(None));
                }
                p.say("A file path is required.")?;
                return Ok(None);
            }

            match image::load(path) {
                Ok(file) => Ok(Some(Some(file))),
                Err(e @ (PostError::Validation(_) | PostError::Io { .. })) => {
                    p.say(&format!("Error: {}\nPlease try again.", e))?;
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Prompt for a caption; an empty one needs confirmation.
    ///
    /// With `keep_current`, a confirmed empty caption means "leave unchanged".
    fn ask_caption(&mut self, keep_current: bool) -> Result<String, SessionError> {
        let confirm_text = if keep_current {
            "Caption left empty, keep the current caption? (Y/N): "
        } else {
            "You have left the caption empty, continue posting with it as it is? (Y/N): "
        };

        self.prompt.retry("caption", |p| {
            let caption = p.ask("Please enter the caption for your post: ")?;
            if !caption.is_empty() {
                return Ok(Some(caption));
            }

            let answer = p.ask(confirm_text)?;
            match answer.trim() {
                a if a.eq_ignore_ascii_case("y") => Ok(Some(String::new())),
                a if a.eq_ignore_ascii_case("n") => Ok(None),
                _ => {
                    p.say("Invalid entry, try again.")?;
                    Ok(None)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::open_in_memory;
    use crate::display::NoViewer;
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x01";
    const JPG: &[u8] = b"\xFF\xD8\xFF\xE0\x00\x10";

    /// Remembers the size of every image it was asked to show.
    #[derive(Default)]
    struct RecordingViewer {
        shown: RefCell<Vec<usize>>,
    }

    impl ImageViewer for RecordingViewer {
        fn show(&self, image: &[u8]) -> crate::error::Result<()> {
            self.shown.borrow_mut().push(image.len());
            Ok(())
        }
    }

    fn settings(user: Option<&str>) -> Settings {
        Settings {
            user: user.map(String::from),
            display_images: true,
            ..Settings::default()
        }
    }

    fn write_image(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn run_script(
        conn: &Connection,
        viewer: &dyn ImageViewer,
        settings: Settings,
        script: &str,
    ) -> (Result<(), SessionError>, String) {
        let mut out = Vec::new();
        let result = {
            let input = Cursor::new(script.as_bytes().to_vec());
            let mut session = Session::new(conn, viewer, settings, input, &mut out);
            session.run()
        };
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_create_flow_for_new_user() {
        let conn = open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let img = write_image(dir.path(), "cat.png", PNG);

        let script = format!("alice\nY\n3\n{}\nhello\n6\n", img.display());
        let (result, out) = run_script(&conn, &NoViewer, settings(None), &script);

        assert!(result.is_ok());
        assert!(out.contains("User not found"));
        assert!(out.contains("Post inserted successfully"));
        assert!(out.contains(&img.display().to_string()));
        assert!(out.contains("Exiting..."));

        let all = posts::get_all(&conn, "alice").unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].caption, "hello");
        assert_eq!(all[0].image, PNG);
        assert_eq!(all[0].comments, 0);
        assert_eq!(all[0].likes, 0);
    }

    #[test]
    fn test_invalid_image_reprompts() {
        let conn = open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let gif = write_image(dir.path(), "anim.gif", b"GIF89a");
        let png = write_image(dir.path(), "ok.png", PNG);

        let script = format!(
            "3\n{}\n{}\ncaption\n6\n",
            gif.display(),
            png.display()
        );
        let (result, out) = run_script(&conn, &NoViewer, settings(Some("bob")).with_create(), &script);

        assert!(result.is_ok());
        assert!(out.contains("Please try again."));
        assert_eq!(posts::get_all(&conn, "bob").unwrap().len(), 1);
    }

    #[test]
    fn test_empty_caption_confirmation() {
        let conn = open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let png = write_image(dir.path(), "ok.png", PNG);

        // maybe -> invalid, N -> re-enter, then confirm empty with y
        let script = format!("3\n{}\n\nmaybe\n\nN\n\ny\n6\n", png.display());
        let (result, out) = run_script(&conn, &NoViewer, settings(Some("bob")).with_create(), &script);

        assert!(result.is_ok());
        assert!(out.contains("Invalid entry, try again."));
        let all = posts::get_all(&conn, "bob").unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].caption, "");
    }

    #[test]
    fn test_invalid_menu_choice_reprompts() {
        let conn = open_in_memory().unwrap();
        posts::ensure_user_table(&conn, "bob").unwrap();

        let (result, out) = run_script(&conn, &NoViewer, settings(Some("bob")), "9\nabc\n6\n");

        assert!(result.is_ok());
        assert_eq!(out.matches("Invalid input, please try again.").count(), 2);
        assert!(out.contains("Exiting..."));
    }

    #[test]
    fn test_list_and_view_show_images() {
        let conn = open_in_memory().unwrap();
        let first = posts::insert(&conn, "bob", "one", PNG).unwrap();
        posts::insert(&conn, "bob", "two", JPG).unwrap();
        let viewer = RecordingViewer::default();

        let script = format!("1\n2\n{}\n6\n", first);
        let (result, out) = run_script(&conn, &viewer, settings(Some("bob")), &script);

        assert!(result.is_ok());
        assert!(out.contains("Text Caption: one"));
        assert!(out.contains("Text Caption: two"));
        assert_eq!(*viewer.shown.borrow(), vec![PNG.len(), JPG.len(), PNG.len()]);
    }

    #[test]
    fn test_no_display_skips_viewer() {
        let conn = open_in_memory().unwrap();
        posts::insert(&conn, "bob", "one", PNG).unwrap();
        let viewer = RecordingViewer::default();
        let mut s = settings(Some("bob"));
        s.display_images = false;

        let (result, _) = run_script(&conn, &viewer, s, "1\n6\n");

        assert!(result.is_ok());
        assert!(viewer.shown.borrow().is_empty());
    }

    #[test]
    fn test_json_listing() {
        let conn = open_in_memory().unwrap();
        posts::insert(&conn, "bob", "one", PNG).unwrap();
        let mut s = settings(Some("bob"));
        s.output.json = true;

        let (result, out) = run_script(&conn, &NoViewer, s, "1\n6\n");

        assert!(result.is_ok());
        assert!(out.contains("\"caption\": \"one\""));
        assert!(out.contains("\"image_format\": \"PNG\""));
    }

    #[test]
    fn test_compact_json_listing() {
        let conn = open_in_memory().unwrap();
        posts::insert(&conn, "bob", "one", PNG).unwrap();
        let mut s = settings(Some("bob"));
        s.output.json = true;
        s.output.compact = true;

        let (result, out) = run_script(&conn, &NoViewer, s, "1\n6\n");

        assert!(result.is_ok());
        // The listing follows the "> " prompt on the same line
        let line = out
            .lines()
            .find(|l| l.contains("[{"))
            .expect("json listing line");
        let json = &line[line.find('[').unwrap()..];
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(value[0]["caption"], "one");
    }

    #[test]
    fn test_storage_error_returns_to_menu() {
        let conn = open_in_memory().unwrap();
        posts::ensure_user_table(&conn, "bob").unwrap();
        conn.execute_batch("DROP TABLE posts").unwrap();

        let (result, out) = run_script(&conn, &NoViewer, settings(Some("bob")), "1\n6\n");

        assert!(result.is_ok());
        assert!(out.contains("Error: storage error"), "output was: {}", out);
        assert_eq!(out.matches(MENU_TEXT).count(), 2);
        assert!(out.trim_end().ends_with("Exiting..."));
    }

    #[test]
    fn test_view_missing_post() {
        let conn = open_in_memory().unwrap();
        posts::ensure_user_table(&conn, "bob").unwrap();

        let (result, out) = run_script(&conn, &NoViewer, settings(Some("bob")), "2\nx\n77\n6\n");

        assert!(result.is_ok());
        assert!(out.contains("Post ID must be a number"));
        assert!(out.contains("Post not found, try again."));
    }

    #[test]
    fn test_update_caption_keeps_image() {
        let conn = open_in_memory().unwrap();
        let id = posts::insert(&conn, "bob", "old", PNG).unwrap();

        let script = format!("4\n{}\n\nnew caption\n6\n", id);
        let (result, out) = run_script(&conn, &NoViewer, settings(Some("bob")), &script);

        assert!(result.is_ok());
        assert!(out.contains("Post updated successfully."));
        let post = posts::get(&conn, "bob", id).unwrap();
        assert_eq!(post.caption, "new caption");
        assert_eq!(post.image, PNG);
    }

    #[test]
    fn test_update_image_keeps_caption() {
        let conn = open_in_memory().unwrap();
        let id = posts::insert(&conn, "bob", "keep", PNG).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let jpg = write_image(dir.path(), "new.jpg", JPG);

        let script = format!("4\n{}\n{}\n\nY\n6\n", id, jpg.display());
        let (result, _) = run_script(&conn, &NoViewer, settings(Some("bob")), &script);

        assert!(result.is_ok());
        let post = posts::get(&conn, "bob", id).unwrap();
        assert_eq!(post.caption, "keep");
        assert_eq!(post.image, JPG);
    }

    #[test]
    fn test_update_with_nothing_is_noop() {
        let conn = open_in_memory().unwrap();
        let id = posts::insert(&conn, "bob", "same", PNG).unwrap();

        let script = format!("4\n{}\n\n\ny\n6\n", id);
        let (result, out) = run_script(&conn, &NoViewer, settings(Some("bob")), &script);

        assert!(result.is_ok());
        assert!(out.contains("Nothing to update."));
        let post = posts::get(&conn, "bob", id).unwrap();
        assert_eq!(post.caption, "same");
        assert_eq!(post.image, PNG);
    }

    #[test]
    fn test_update_missing_post() {
        let conn = open_in_memory().unwrap();
        posts::ensure_user_table(&conn, "bob").unwrap();

        let (result, out) = run_script(&conn, &NoViewer, settings(Some("bob")), "4\n5\n6\n");

        assert!(result.is_ok());
        assert!(out.contains("Post not found, try again."));
    }

    #[test]
    fn test_delete_flow() {
        let conn = open_in_memory().unwrap();
        let id = posts::insert(&conn, "bob", "bye", PNG).unwrap();

        let script = format!("5\n{}\n5\n{}\n6\n", id, id);
        let (result, out) = run_script(&conn, &NoViewer, settings(Some("bob")), &script);

        assert!(result.is_ok());
        assert!(out.contains("Post deleted successfully."));
        assert!(out.contains("Post not found, try again."));
        assert!(!posts::exists(&conn, "bob", id).unwrap());
    }

    #[test]
    fn test_eof_ends_session() {
        let conn = open_in_memory().unwrap();
        posts::ensure_user_table(&conn, "bob").unwrap();

        let (result, out) = run_script(&conn, &NoViewer, settings(Some("bob")), "3\n");

        assert!(result.is_ok());
        assert!(!out.contains("Exiting..."));
    }

    #[test]
    fn test_too_many_bad_post_ids_returns_to_menu() {
        let conn = open_in_memory().unwrap();
        posts::ensure_user_table(&conn, "bob").unwrap();
        let mut s = settings(Some("bob"));
        s.max_attempts = 2;

        let (result, out) = run_script(&conn, &NoViewer, s, "2\na\nb\n6\n");

        assert!(result.is_ok());
        assert!(out.contains("too many invalid attempts entering post ID"));
        assert!(out.contains("Exiting..."));
    }

    #[test]
    fn test_unknown_preselected_user() {
        let conn = open_in_memory().unwrap();

        let (result, _) = run_script(&conn, &NoViewer, settings(Some("ghost")), "6\n");

        match result {
            Err(SessionError::Store(e)) => assert!(e.is_not_found()),
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert!(!posts::user_exists(&conn, "ghost").unwrap());
    }

    #[test]
    fn test_declining_user_creation_reprompts() {
        let conn = open_in_memory().unwrap();
        posts::ensure_user_table(&conn, "carol").unwrap();

        let (result, out) = run_script(&conn, &NoViewer, settings(None), "dave\nN\ncarol\n6\n");

        assert!(result.is_ok());
        assert!(out.contains("Known users: carol"));
        assert!(out.contains("User exists"));
        assert!(!posts::user_exists(&conn, "dave").unwrap());
    }

    impl Settings {
        fn with_create(mut self) -> Self {
            self.create_user = true;
            self
        }
    }
}
