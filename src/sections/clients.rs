//! "Trusted by" logo wall.

use super::{Section, Site, heading, revealed, skeleton};
use crate::content::ClientLogo;
use crate::reveal::SectionMount;
use maud::{Markup, html};

const COLUMNS: usize = 6;
const ROW_HEIGHT: f64 = 140.0;
const HEADER_HEIGHT: f64 = 160.0;

pub struct ClientsWall<'a> {
    pub items: &'a [ClientLogo],
}

impl Section for ClientsWall<'_> {
    const NAME: &'static str = "clients";

    fn render(&self, mount: &mut SectionMount, _site: Site<'_>) -> Markup {
        mount.skip(HEADER_HEIGHT);
        let cells = mount.reveal_grid("logo", self.items.len(), COLUMNS, ROW_HEIGHT);
        html! {
            section.section.clients id="clients" {
                (heading("TRUSTED BY", "Brands we have worked with"))
                @if self.items.is_empty() {
                    (skeleton(COLUMNS, "Our partners will appear here."))
                } @else {
                    div.logo-grid {
                        @for (client, attrs) in self.items.iter().zip(&cells) {
                            (revealed(attrs, "logo", html! {
                                img src=(client.logo) alt=(client.name) loading="lazy";
                            }))
                        }
                    }
                }
            }
        }
    }
}
