#![forbid(unsafe_code)]
#![allow(dead_code)]

//! Shared fixture: an in-memory copy of the portfolio page layout.

use folio_core::MemoryPage;
use folio_core::memory::{ElementSpec, MemoryElement};

pub const NAV_HEIGHT: f64 = 70.0;

/// Section ids with their `(top, height)` boxes, in document order.
pub const SECTIONS: [(&str, f64, f64); 5] = [
    ("home", 0.0, 700.0),
    ("about", 700.0, 900.0),
    ("skills", 1600.0, 800.0),
    ("projects", 2400.0, 1200.0),
    ("contact", 3600.0, 900.0),
];

pub struct Fixture {
    pub page: MemoryPage,
    pub navbar: MemoryElement,
    pub toggle: MemoryElement,
    pub menu: MemoryElement,
    /// One link per section, plus an external résumé link at the end.
    pub links: Vec<MemoryElement>,
    pub sections: Vec<MemoryElement>,
    pub cards: Vec<MemoryElement>,
    pub form: MemoryElement,
    pub inputs: [MemoryElement; 4],
    pub groups: [MemoryElement; 4],
    pub errors: [MemoryElement; 4],
    pub submit: MemoryElement,
    pub success: MemoryElement,
}

pub fn portfolio_page() -> Fixture {
    let mut page = MemoryPage::new();
    page.set_viewport(800.0, 4500.0);

    let navbar = page.append(
        None,
        ElementSpec::new("nav")
            .id("navbar")
            .class("nav")
            .bounds(0.0, NAV_HEIGHT),
    );
    let toggle = page.append(Some(navbar), ElementSpec::new("button").id("navToggle"));
    let menu = page.append(Some(navbar), ElementSpec::new("ul").id("navMenu"));
    let mut links: Vec<MemoryElement> = SECTIONS
        .iter()
        .map(|(id, ..)| {
            page.append(
                Some(menu),
                ElementSpec::new("a")
                    .class("nav-link")
                    .attr("href", &format!("#{id}")),
            )
        })
        .collect();
    links.push(page.append(
        Some(menu),
        ElementSpec::new("a")
            .class("nav-link")
            .attr("href", "resume.pdf"),
    ));

    let sections: Vec<MemoryElement> = SECTIONS
        .iter()
        .map(|(id, top, height)| {
            page.append(None, ElementSpec::new("section").id(id).bounds(*top, *height))
        })
        .collect();

    let about = sections[1];
    let skills = sections[2];
    let projects = sections[3];
    let contact = sections[4];
    let cards = vec![
        page.append(Some(about), ElementSpec::new("div").class("about-card")),
        page.append(Some(skills), ElementSpec::new("div").class("skill-category")),
        page.append(Some(projects), ElementSpec::new("article").class("project-card")),
        page.append(Some(projects), ElementSpec::new("article").class("project-card")),
        page.append(Some(projects), ElementSpec::new("li").class("timeline-item")),
    ];

    let form = page.append(Some(contact), ElementSpec::new("form").id("contactForm"));
    let mut groups = Vec::new();
    let mut inputs = Vec::new();
    let mut errors = Vec::new();
    for (id, tag) in [
        ("name", "input"),
        ("email", "input"),
        ("subject", "input"),
        ("message", "textarea"),
    ] {
        let group = page.append(Some(form), ElementSpec::new("div").class("form-group"));
        inputs.push(page.append(Some(group), ElementSpec::new(tag).id(id)));
        errors.push(page.append(
            Some(group),
            ElementSpec::new("span").id(&format!("{id}Error")),
        ));
        groups.push(group);
    }
    let submit = page.append(
        Some(form),
        ElementSpec::new("button")
            .attr("type", "submit")
            .text("<span>Send Message</span>"),
    );
    let success = page.append(Some(contact), ElementSpec::new("div").id("formSuccess"));

    Fixture {
        page,
        navbar,
        toggle,
        menu,
        links,
        sections,
        cards,
        form,
        inputs: to_array(inputs),
        groups: to_array(groups),
        errors: to_array(errors),
        submit,
        success,
    }
}

fn to_array(v: Vec<MemoryElement>) -> [MemoryElement; 4] {
    v.try_into().expect("four form fields")
}
