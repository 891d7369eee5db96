use std::io::{BufRead, Read, Write};

use anyhow::{Context, Result};
use nesdbg_link::Link;
use nesdbg_proto::parse_command;
use tracing::{debug, warn};

use crate::dump::render_reply;

/// Executes text commands against a link, one per line.
pub struct App<T> {
    link: Link<T>,
}

impl<T: Read + Write> App<T> {
    pub fn new(link: Link<T>) -> Self {
        Self { link }
    }

    pub fn link_mut(&mut self) -> &mut Link<T> {
        &mut self.link
    }

    /// Run every command in `input`, printing replies to `out`.
    ///
    /// Parse errors are reported and skipped; link errors stop the run.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        for (index, line) in input.lines().enumerate() {
            let line = line.context("reading command input")?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let command = match parse_command(line) {
                Ok(command) => command,
                Err(err) => {
                    warn!(line = index + 1, "{}", err);
                    writeln!(out, "error: {err}")?;
                    continue;
                }
            };

            debug!(line = index + 1, opcode = %command.opcode(), "executing");
            let reply = self
                .link
                .send(&command)
                .with_context(|| format!("line {}: `{}`", index + 1, line))?;
            writeln!(out, "{}", render_reply(&command, &reply))?;
        }

        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Byte stream with canned replies that records what was written.
    struct Scripted {
        written: Vec<u8>,
        replies: Cursor<Vec<u8>>,
    }

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.replies.read(buf)
        }
    }

    impl Write for Scripted {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn app(replies: &[u8]) -> App<Scripted> {
        App::new(Link::new(Scripted {
            written: Vec::new(),
            replies: Cursor::new(replies.to_vec()),
        }))
    }

    #[test]
    fn runs_script_and_skips_comments() {
        let mut app = app(&[0x4C, 0x00, 0x80, 0x01]);
        let script = "# reset vector\ncpumemrd 0xfffc 3\n\nquerydbgbrk\ndbgrun\n";
        let mut out = Vec::new();

        app.run(script.as_bytes(), &mut out).expect("run");

        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "FFFC: 4C 00 80\nhalted\nok\n"
        );
        assert_eq!(
            app.link_mut().get_ref().written,
            vec![0x01, 0xFC, 0xFF, 0x03, 0x00, 0x07, 0x04]
        );
    }

    #[test]
    fn parse_errors_do_not_stop_the_run() {
        let mut app = app(&[]);
        let mut out = Vec::new();

        app.run("bogus 1\ndbgbrk\n".as_bytes(), &mut out)
            .expect("run");

        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "error: unknown command `bogus`\nok\n");
    }

    #[test]
    fn link_errors_abort_with_line_context() {
        let mut app = app(&[0x01]);
        let mut out = Vec::new();

        let err = app
            .run("cpuregrd x\ncpumemrd 0 4\n".as_bytes(), &mut out)
            .expect_err("short read");

        assert!(format!("{err:#}").contains("line 2"));
    }
}
