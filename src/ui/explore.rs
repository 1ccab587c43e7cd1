//! Explore screen: original and compressed side by side, slider, legend

use iced::widget::image::{Handle, Image};
use iced::widget::{button, column, container, horizontal_space, row, slider, text, Column};
use iced::{Alignment, Element, Length};

use super::{zones, Message, ViewHandles, ERROR_COLOR};
use crate::state::explorer::{Explorer, Phase};
use crate::state::params::{MAX_PARAMETER, MIN_PARAMETER};

const PANEL_HEIGHT: f32 = 420.0;

pub fn view<'a>(explorer: &'a Explorer, views: &'a ViewHandles) -> Element<'a, Message> {
    if let Some(error) = explorer.blocking_error() {
        return failed(error.to_string());
    }

    let original_placeholder = if explorer.phase() == Phase::LoadingOriginal {
        "Loading..."
    } else {
        ""
    };
    let compressed_placeholder = if explorer.is_busy() {
        "Compressing..."
    } else {
        "Adjust slider to compress"
    };

    let panels = row![
        panel(
            "Original Image (Grayscale)",
            views.original(),
            original_placeholder
        ),
        panel(
            "Compressed Image",
            views.compressed(),
            compressed_placeholder
        ),
    ]
    .spacing(20);

    let value = explorer.slider_value();
    let controls = column![
        row![
            text(format!("Singular Values: {}", value)).size(16),
            horizontal_space(),
            button("Reset")
                .on_press(Message::Reset)
                .style(button::secondary),
            button("New image")
                .on_press(Message::Back)
                .style(button::secondary),
        ]
        .spacing(10)
        .align_y(Alignment::Center),
        slider(MIN_PARAMETER..=MAX_PARAMETER, value, Message::SliderMoved).step(1u16),
        row![
            text(format!("{}", MIN_PARAMETER)).size(12),
            horizontal_space(),
            text(format!("{}", MAX_PARAMETER)).size(12),
        ],
    ]
    .spacing(8);

    let heading = match explorer.image() {
        Some(image) => format!("SVD Image Compression ({})", image),
        None => "SVD Image Compression".to_string(),
    };
    let shown = match explorer.shown_quality() {
        Some(quality) => format!("Showing {} singular values", quality),
        None => String::new(),
    };

    let mut content: Column<Message> = column![
        text(heading).size(28),
        panels,
        text(shown).size(13),
        controls,
    ]
    .spacing(20)
    .padding(30);

    // Transient: the last good image stays up and the slider keeps working
    if let Some(error) = explorer.last_error() {
        content = content.push(text(error.to_string()).size(14).color(ERROR_COLOR));
    }

    content = content.push(zones::legend(explorer.zone()));

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .into()
}

fn panel<'a>(title: &'a str, handle: Option<&Handle>, placeholder: &'a str) -> Element<'a, Message> {
    let body: Element<'a, Message> = match handle {
        Some(handle) => Image::new(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => text(placeholder).size(14).into(),
    };

    column![
        text(title).size(18),
        container(body)
            .padding(8)
            .center_x(Length::Fill)
            .center_y(Length::Fixed(PANEL_HEIGHT))
            .style(container::rounded_box),
    ]
    .spacing(8)
    .width(Length::FillPortion(1))
    .into()
}

fn failed<'a>(message: String) -> Element<'a, Message> {
    let content = column![
        text("Error").size(24).color(ERROR_COLOR),
        text(message).size(16),
        button("New image").on_press(Message::Back).padding(10),
    ]
    .spacing(16)
    .align_x(Alignment::Center);

    container(
        container(content)
            .padding(30)
            .style(container::rounded_box),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}
