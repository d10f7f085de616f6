//! User-facing copy. Menu screens are sent as Telegram HTML; everything else
//! is plain text.

pub const START_MESSAGE: &str = "Привет! Это бот для анонимного общения с психологом. \
Вы можете отправить свою проблему анонимно, а психолог ответит вам.";

pub const ABOUT_COMMUNITY: &str = "🔹 <b>О сообществе</b>\n\n\
Это сообщество создано для того, чтобы помочь людям \
в трудных ситуациях. Здесь вы можете получить \
анонимную поддержку от профессионального психолога.";

pub const ABOUT_PSYCHOLOGIST: &str = "👩‍⚕️ <b>О психологе</b>\n\n\
Наш психолог - квалифицированный специалист с \
многолетним опытом работы. Специализация: \
тревожные расстройства, депрессия, отношения.";

pub const WRITE_PROBLEM: &str = "✍️ <b>Написать о проблеме</b>\n\n\
Напишите ваше сообщение, запишите голосовое или отправьте видео-кружок, \
и оно будет анонимно переправлено психологу. \
Психолог ответит вам в ближайшее время.";

pub const BUTTON_ABOUT_COMMUNITY: &str = "О сообществе";
pub const BUTTON_ABOUT_PSYCHOLOGIST: &str = "О психологе";
pub const BUTTON_CHECK_RESPONSE: &str = "Ответ психолога";
pub const BUTTON_WRITE_PROBLEM: &str = "Написать о проблеме";
pub const BUTTON_BACK: &str = "Назад";

pub const RELAYED_TEXT_CONFIRMATION: &str = "Ваше сообщение было отправлено психологу. \
Ожидайте ответа. Вы можете проверить ответы, нажав кнопку \
'Ответ психолога' в главном меню.";

pub const RELAYED_MEDIA_CONFIRMATION: &str = "Ваше медиа-сообщение было отправлено психологу. \
Ожидайте ответа. Вы можете проверить ответы, нажав кнопку \
'Ответ психолога' в главном меню.";

pub const NO_RESPONSES: &str = "Пока нет ответов от психолога.";

pub const USE_MENU: &str = "Чтобы написать психологу, нажмите \
'Написать о проблеме' в главном меню.";

pub const UNSUPPORTED_CONTENT: &str = "Этот формат не поддерживается. \
Отправьте текст, голосовое сообщение или видео-кружок.";

pub const TEMPORARILY_UNAVAILABLE: &str =
    "Сервис временно недоступен. Пожалуйста, попробуйте позже.";

pub const DELIVERY_FAILED: &str =
    "Не удалось отправить сообщение. Пожалуйста, попробуйте ещё раз.";

/// Prefix for user text relayed into the moderator chat.
pub const ANONYMOUS_MESSAGE_HEADER: &str = "Анонимное сообщение:";

/// Prefix for a text reply pushed to the user as soon as it arrives.
pub const LIVE_RESPONSE_HEADER: &str = "Вы получили ответ от психолога:";

/// Prefix for a text reply delivered on "check responses".
pub const RESPONSE_HEADER: &str = "Ответ психолога:";

pub const VOICE_RESPONSE_ANNOTATION: &str = "☝️ Голосовой ответ психолога";
pub const VIDEO_NOTE_RESPONSE_ANNOTATION: &str = "☝️ Видео-ответ психолога";

/// Telegram's limit for one text message, in UTF-16 code units.
pub const MAX_MESSAGE_LEN: usize = 4096;
