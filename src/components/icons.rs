//! Centralized icon definitions.
//!
//! Icon theme is configured in `config.rs` via `ICON_THEME`.
//! This module maps semantic icon names to the selected theme's icons.

use icondata::Icon;

use crate::config::IconTheme;
use crate::models::FileKind;

// =============================================================================
// Theme Imports
// =============================================================================

mod lucide {
    pub use icondata::{
        LuBookOpen as FilePdf, LuCheck as Check, LuDownload as Download, LuFile as File,
        LuFileSpreadsheet as FileSheet, LuFileText as FileText, LuFileText as FileWord,
        LuFolder as Folder, LuHouse as Home, LuImage as FileImage, LuLogOut as Logout,
        LuPencil as Edit, LuPlus as Plus, LuPresentation as FileSlides, LuSearch as Search,
        LuSettings as Settings, LuShare2 as Share, LuTrash2 as Trash, LuUpload as Upload,
        LuUser as User, LuX as Close,
    };
}

mod bootstrap {
    pub use icondata::{
        BsBoxArrowRight as Logout, BsCheckLg as Check, BsDownload as Download,
        BsFileEarmark as File, BsFileEarmarkImage as FileImage, BsFileEarmarkPdf as FilePdf,
        BsFileEarmarkSlides as FileSlides, BsFileEarmarkSpreadsheet as FileSheet,
        BsFileEarmarkText as FileText, BsFileEarmarkWord as FileWord, BsFolderFill as Folder,
        BsGear as Settings, BsHouseFill as Home, BsPencil as Edit, BsPerson as User,
        BsPlusLg as Plus, BsSearch as Search, BsShare as Share, BsTrash as Trash,
        BsUpload as Upload, BsXLg as Close,
    };
}

// =============================================================================
// Icon Constants (selected based on theme)
// =============================================================================

macro_rules! themed_icon {
    ($name:ident, $theme_name:ident) => {
        pub const $name: Icon = match crate::config::ICON_THEME {
            IconTheme::Lucide => lucide::$theme_name,
            IconTheme::Bootstrap => bootstrap::$theme_name,
        };
    };
}

themed_icon!(HOME, Home);
themed_icon!(FOLDER, Folder);
themed_icon!(FILE, File);
themed_icon!(FILE_TEXT, FileText);
themed_icon!(FILE_PDF, FilePdf);
themed_icon!(FILE_IMAGE, FileImage);
themed_icon!(FILE_WORD, FileWord);
themed_icon!(FILE_SLIDES, FileSlides);
themed_icon!(FILE_SHEET, FileSheet);
themed_icon!(SEARCH, Search);
themed_icon!(PLUS, Plus);
themed_icon!(UPLOAD, Upload);
themed_icon!(DOWNLOAD, Download);
themed_icon!(SHARE, Share);
themed_icon!(EDIT, Edit);
themed_icon!(TRASH, Trash);
themed_icon!(CLOSE, Close);
themed_icon!(CHECK, Check);
themed_icon!(USER, User);
themed_icon!(SETTINGS, Settings);
themed_icon!(LOGOUT, Logout);

/// Static icon for a document that has no thumbnail.
pub fn for_file(filename: &str) -> Icon {
    match FileKind::from_filename(filename) {
        FileKind::Image => FILE_IMAGE,
        FileKind::Pdf => FILE_PDF,
        FileKind::Text => FILE_TEXT,
        FileKind::Word => FILE_WORD,
        FileKind::Slides => FILE_SLIDES,
        FileKind::Spreadsheet => FILE_SHEET,
        FileKind::Unknown => FILE,
    }
}
