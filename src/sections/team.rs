use super::{Section, Site, heading, revealed, skeleton};
use crate::content::TeamMember;
use crate::reveal::SectionMount;
use maud::{Markup, html};

const COLUMNS: usize = 4;
const ROW_HEIGHT: f64 = 420.0;
const HEADER_HEIGHT: f64 = 180.0;

pub struct TeamGrid<'a> {
    pub items: &'a [TeamMember],
}

impl Section for TeamGrid<'_> {
    const NAME: &'static str = "team";

    fn render(&self, mount: &mut SectionMount, _site: Site<'_>) -> Markup {
        mount.skip(HEADER_HEIGHT);
        let cells = mount.reveal_grid("member", self.items.len(), COLUMNS, ROW_HEIGHT);
        html! {
            section.section.team id="team" {
                (heading("OUR TEAM", "The people behind the camera"))
                @if self.items.is_empty() {
                    (skeleton(COLUMNS, "Meet the team soon."))
                } @else {
                    div.team-grid {
                        @for (member, attrs) in self.items.iter().zip(&cells) {
                            (revealed(attrs, "member", html! {
                                img src=(member.photo) alt=(member.name) loading="lazy";
                                h3 { (member.name) }
                                @if let Some(role) = &member.role {
                                    p.role { (role) }
                                }
                            }))
                        }
                    }
                }
            }
        }
    }
}
