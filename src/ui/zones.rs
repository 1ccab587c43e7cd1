//! Legend explaining what each range of singular values looks like

use iced::widget::{container, row, text, Column};
use iced::{Color, Element, Length, Theme};

use super::Message;
use crate::state::params::Zone;

fn accent(zone: Zone) -> Color {
    match zone {
        Zone::High | Zone::MediumHigh => Color::from_rgb(0.23, 0.51, 0.96),
        Zone::Optimal => Color::from_rgb(0.13, 0.77, 0.37),
        Zone::MediumLow => Color::from_rgb(0.92, 0.70, 0.03),
        Zone::Low => Color::from_rgb(0.94, 0.27, 0.27),
    }
}

/// One line per zone, with `active` highlighted.
pub fn legend<'a>(active: Zone) -> Element<'a, Message> {
    let mut list = Column::new()
        .spacing(4)
        .push(text("Compression level explanation:").size(15));

    for zone in Zone::ALL {
        let line = row![
            text(format!("{}:", zone.title())).size(14).color(accent(zone)),
            text(zone.description()).size(14),
        ]
        .spacing(6);

        let item = container(line).padding(6).width(Length::Fill);
        let item = if zone == active {
            item.style(move |theme: &Theme| container::Style {
                background: Some(Color { a: 0.15, ..accent(zone) }.into()),
                ..container::rounded_box(theme)
            })
        } else {
            item
        };

        list = list.push(item);
    }

    container(list)
        .padding(12)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}
