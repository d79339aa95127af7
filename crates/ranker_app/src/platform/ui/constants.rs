pub const PROMPT: &str = "> ";
pub const BOT_AVATAR: &str = "[B]";
pub const USER_AVATAR: &str = "[U]";
pub const BANNER_MARK: &str = "!!";

pub const HELP_TEXT: &str = "\
Type a job posting URL and press Enter to send it.
End a line with \\ to continue on the next line without sending (Shift+Enter).
Commands:
  :upload <path>   pick your resume (PDF only)
  :send            send the current URL and resume
  :clear           empty the URL field
  :status          show the current form state
  :help            show this help
  :quit            leave";
