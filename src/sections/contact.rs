//! Contact page: form, office cards and map.
//!
//! The form renders from a [`ContactSession`], so a failed submission shows
//! the entered values with an inline error under each offending field and a
//! successful one shows the confirmation over an empty form. In the browser,
//! `contact.js` applies the same rules before posting.

use super::{Section, Site, heading, revealed};
use crate::contact::{ContactError, ContactSession, Field, messages};
use crate::map::MapMarker;
use crate::reveal::SectionMount;
use maud::{Markup, html};
use tracing::warn;

const FORM_HEIGHT: f64 = 560.0;
const CARD_HEIGHT: f64 = 220.0;
const HEADER_HEIGHT: f64 = 180.0;

pub struct ContactSection<'a> {
    pub session: &'a ContactSession,
}

fn input_field(session: &ContactSession, field: Field, label: &str, kind: &str, missing: &str) -> Markup {
    let name = field.to_string();
    let error_id = format!("{name}-error");
    let error = session.error_for(field);
    let value = match field {
        Field::Name => &session.form.name,
        Field::Email => &session.form.email,
        Field::Message => &session.form.message,
    };
    html! {
        div.form-field.invalid[error.is_some()] {
            label for=(name) { (label) }
            @if field == Field::Message {
                textarea id=(name) name=(name) rows="6" required
                    data-msg-missing=(missing)
                    aria-describedby=(error_id)
                    aria-invalid=[error.map(|_| "true")] { (value) }
            } @else {
                input id=(name) name=(name) type=(kind) value=(value) required
                    data-msg-missing=(missing)
                    data-msg-invalid=[(field == Field::Email).then_some(messages::EMAIL_INVALID)]
                    aria-describedby=(error_id)
                    aria-invalid=[error.map(|_| "true")];
            }
            p.field-error id=(error_id) role="alert" { @if let Some(message) = error { (message) } }
        }
    }
}

impl Section for ContactSection<'_> {
    const NAME: &'static str = "contact";

    fn render(&self, mount: &mut SectionMount, site: Site<'_>) -> Markup {
        let contact = &site.config.contact;
        mount.skip(HEADER_HEIGHT);
        let form_attrs = mount.reveal("form", FORM_HEIGHT);
        let cards = mount.reveal_grid("card", 3, 3, CARD_HEIGHT);
        let (action, enctype) = match &contact.endpoint {
            Some(endpoint) => (endpoint.clone(), None),
            None => (format!("mailto:{}", contact.email), Some("text/plain")),
        };
        let marker = match MapMarker::from_config(&site.config.map) {
            Ok(marker) => Some(marker),
            Err(e) => {
                warn!("map disabled: {e}");
                None
            }
        };
        html! {
            section.section.contact id="contact" {
                (heading("CONTACT US", "Let's tell your story"))
                (revealed(&form_attrs, "contact-form-wrap", html! {
                    @if let Some(receipt) = self.session.confirmation() {
                        p.form-confirmation role="status" data-reference=(receipt.reference) {
                            "Thank you. Your message is on its way and we will reply soon."
                        }
                    }
                    @if let Some(ContactError::Delivery(_)) = self.session.last_error() {
                        p.form-failure role="alert" {
                            "We could not send your message. Please try again or email us directly."
                        }
                    }
                    form.contact-form method="post" action=(action) enctype=[enctype] novalidate data-contact {
                        (input_field(self.session, Field::Name, "Name", "text", messages::NAME_MISSING))
                        (input_field(self.session, Field::Email, "Email", "email", messages::EMAIL_MISSING))
                        (input_field(self.session, Field::Message, "Message", "text", messages::MESSAGE_MISSING))
                        button.button.cta type="submit" { "SEND MESSAGE" }
                    }
                }))
                div.office-cards {
                    (revealed(&cards[0], "office-card", html! {
                        h3 { "Email" }
                        a href=(format!("mailto:{}", contact.email)) { (contact.email) }
                    }))
                    (revealed(&cards[1], "office-card", html! {
                        h3 { "Phone" }
                        a href=(format!("tel:{}", contact.phone.replace(' ', ""))) { (contact.phone) }
                    }))
                    (revealed(&cards[2], "office-card", html! {
                        h3 { "Office" }
                        address {
                            @for (i, line) in contact.address.iter().enumerate() {
                                @if i > 0 { br; }
                                (line)
                            }
                        }
                    }))
                }
                @if let Some(marker) = marker {
                    (marker.render())
                }
            }
        }
    }
}
