// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use jiff::tz::TimeZone;

use crate::Error;
use crate::Layout;
use crate::color::LevelColor;
use crate::layout::format_clock;
use crate::record::Record;

/// The widest level token a line carries. Longer level names are truncated.
const LEVEL_WIDTH: usize = 5;

/// A layout that formats log records as human-readable text.
///
/// Output format:
///
/// ```text
/// 22:44:57.172 main.rs:51 >CRITI - Hello critical!
/// 22:44:57.172 main.rs:52 >ERROR - Hello error!
/// 22:44:57.172 main.rs:53 >WARNI - Hello warning!
/// 22:44:57.172 main.rs:54 >NOTIC - Hello notice!
/// 22:44:57.172 main.rs:55 >INFO - Hello info!
/// 22:44:57.172 main.rs:56 >DEBUG - Hello debug!
/// ```
///
/// By default, the level token is colored and followed by a color reset. Use
/// [`TextLayout::no_color`] for file sinks.
///
/// # Examples
///
/// ```
/// use logswitch::layout::TextLayout;
///
/// let console_layout = TextLayout::default();
/// let file_layout = TextLayout::default().no_color();
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    colors: LevelColor,
    no_color: bool,
    tz: Option<TimeZone>,
}

impl TextLayout {
    /// Customize the color of each log level; no effect if `no_color` is set.
    pub fn colors(mut self, colors: LevelColor) -> Self {
        self.colors = colors;
        self
    }

    /// Disable colored output.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Set the timezone for timestamps. Defaults to the system timezone.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::tz::TimeZone;
    /// use logswitch::layout::TextLayout;
    ///
    /// let layout = TextLayout::default().timezone(TimeZone::UTC);
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }
}

impl Layout for TextLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let time = format_clock(record.time(), self.tz.as_ref())?;

        let name = record.level().as_str();
        let token = &name[..name.len().min(LEVEL_WIDTH)];
        let level = self.colors.colorize(self.no_color, record.level(), token);

        let file = match record.filename() {
            "" => "???",
            file => file,
        };
        let line = record.line().unwrap_or_default();
        let message = record.args();

        Ok(format!("{time} {file}:{line} >{level} - {message}").into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use std::time::SystemTime;

    use super::*;
    use crate::Level;

    fn format_line(level: Level, message: &str) -> String {
        let layout = TextLayout::default().no_color().timezone(TimeZone::UTC);
        let bytes = layout
            .format(
                &Record::builder()
                    .time(SystemTime::UNIX_EPOCH + Duration::from_millis(45_296_007))
                    .level(level)
                    .file(Some("src/worker/job.rs"))
                    .line(Some(17))
                    .args(format_args!("{message}"))
                    .build(),
            )
            .unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_plain_line_format() {
        assert_eq!(
            format_line(Level::Info, "job started"),
            "12:34:56.007 job.rs:17 >INFO - job started"
        );
        assert_eq!(
            format_line(Level::Warning, "slow"),
            "12:34:56.007 job.rs:17 >WARNI - slow"
        );
        assert_eq!(
            format_line(Level::Critical, "down"),
            "12:34:56.007 job.rs:17 >CRITI - down"
        );
    }

    #[test]
    fn test_unknown_location() {
        let layout = TextLayout::default().no_color().timezone(TimeZone::UTC);
        let record = Record::builder()
            .time(SystemTime::UNIX_EPOCH)
            .level(Level::Debug)
            .args(format_args!("x"))
            .build();
        let line = String::from_utf8(layout.format(&record).unwrap()).unwrap();
        assert_eq!(line, "00:00:00.000 ???:0 >DEBUG - x");
    }

    #[test]
    fn test_colored_level_is_reset() {
        colored::control::set_override(true);
        let layout = TextLayout::default().timezone(TimeZone::UTC);
        let record = Record::builder()
            .time(SystemTime::UNIX_EPOCH)
            .level(Level::Error)
            .file(Some("lib.rs"))
            .line(Some(1))
            .args(format_args!("boom"))
            .build();
        let line = String::from_utf8(layout.format(&record).unwrap()).unwrap();
        colored::control::unset_override();

        assert_eq!(line, "00:00:00.000 lib.rs:1 >\x1b[31mERROR\x1b[0m - boom");
    }
}
