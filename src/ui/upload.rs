//! Upload screen

use iced::widget::{button, column, container, text, Column};
use iced::{Alignment, Element, Length};

use super::{Message, UploadForm, ERROR_COLOR};

pub fn view(form: &UploadForm, limit: u64) -> Element<'_, Message> {
    let mut content: Column<Message> = column![
        text("Grayscale SVD Compression").size(36),
        text(
            "Upload an image to compress it using Singular Value Decomposition (SVD). \
             The image will be converted to grayscale and compressed while preserving key features."
        )
        .size(15),
        button("Choose Image").on_press(Message::PickFile).padding(10),
    ]
    .spacing(20)
    .padding(40)
    .max_width(560)
    .align_x(Alignment::Center);

    if let Some(file) = &form.selected {
        content = content.push(
            text(format!(
                "Selected file: {} ({:.2} MB)",
                file.file_name,
                file.size_mb()
            ))
            .size(14),
        );
    }

    if let Some(error) = &form.error {
        content = content.push(text(error.as_str()).size(14).color(ERROR_COLOR));
    }

    let label = if form.uploading {
        "Processing..."
    } else {
        "Upload and Compress"
    };
    let can_upload = form.selected.is_some() && !form.uploading;
    content = content.push(
        button(label)
            .on_press_maybe(can_upload.then_some(Message::Upload))
            .padding(10),
    );

    content = content.push(
        text(format!(
            "PNG, JPG or GIF (Max {}MB)",
            limit / (1024 * 1024)
        ))
        .size(12),
    );

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
