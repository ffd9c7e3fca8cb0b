//! Ordered decision tables for provisional MMFF symbols.
//!
//! Each element has a list of `(symbol, predicate)` rules that is evaluated
//! top-down; the first predicate that holds names the atom. More specific
//! functional groups therefore sit above the generic ones.

use std::collections::HashMap;

use lazy_static::lazy_static;

use super::{OxygenClass, TypingContext};
use crate::environment::{Environment, Group, GroupCounts};
use crate::Element;

/// One atom seen through a [`TypingContext`].
#[derive(Clone, Copy)]
pub struct Site<'a> {
    ctx: &'a TypingContext<'a>,
    atom: usize,
}

impl<'a> Site<'a> {
    pub(crate) fn new(ctx: &'a TypingContext<'a>, atom: usize) -> Self {
        Self { ctx, atom }
    }

    pub fn index(&self) -> usize {
        self.atom
    }

    pub fn element(&self) -> Element {
        self.ctx.atom(self.atom).element
    }

    pub fn charge(&self) -> i32 {
        self.ctx.atom(self.atom).charge_or_zero()
    }

    pub fn env(&self) -> &'a Environment {
        &self.ctx.environments[self.atom]
    }

    pub fn groups(&self) -> &'a GroupCounts {
        &self.ctx.groups[self.atom]
    }

    pub fn oxygen_class(&self) -> Option<OxygenClass> {
        self.ctx.oxygen[self.atom]
    }

    pub fn degree(&self) -> u8 {
        self.env().degree
    }

    pub fn is_terminal(&self) -> bool {
        self.ctx.adjacency.degree(self.atom) == 1
    }

    pub fn in_ring(&self, size: usize) -> bool {
        self.ctx.in_ring(self.atom, size)
    }

    /// Whether both atoms sit on one common ring of `size` atoms.
    pub fn shares_ring(&self, other: &Site<'_>, size: usize) -> bool {
        self.ctx
            .rings_of_size(size)
            .any(|walk| walk.contains(&self.atom) && walk.contains(&other.atom))
    }

    /// Neighbours paired with the numeric order of the connecting bond.
    pub fn bonds(&self) -> impl Iterator<Item = (Site<'a>, u8)> + 'a {
        let (ctx, atom) = (self.ctx, self.atom);
        ctx.adjacency
            .neighbors(atom)
            .iter()
            .map(move |&nbr| (Site::new(ctx, nbr), ctx.bond_order(atom, nbr)))
    }

    pub fn neighbors(&self) -> impl Iterator<Item = Site<'a>> + 'a {
        self.bonds().map(|(site, _)| site)
    }

    pub fn any_neighbor(&self, element: Element, pred: impl Fn(&Site<'a>, u8) -> bool) -> bool {
        self.bonds()
            .any(|(nbr, order)| nbr.element() == element && pred(&nbr, order))
    }

    /// The neighbour across the only double bond, if there is exactly one.
    pub fn double_partner(&self) -> Option<Site<'a>> {
        let mut partners = self.bonds().filter(|(_, order)| *order == 2);
        match (partners.next(), partners.next()) {
            (Some((partner, _)), None) => Some(partner),
            _ => None,
        }
    }

    /// Hydroxy, ether and hetero-ether oxygens published to this atom.
    fn oxy_links(&self) -> u8 {
        let groups = self.groups();
        groups.count(Group::Hydroxy) + groups.count(Group::Ether) + groups.count(Group::HeteroEther)
    }
}

pub struct Rule {
    pub symbol: &'static str,
    pub matches: fn(&Site<'_>) -> bool,
}

fn rule(symbol: &'static str, matches: fn(&Site<'_>) -> bool) -> Rule {
    Rule { symbol, matches }
}

/// A carbon double bonded to a cationic nitrogen.
fn cationic_carbon(c: &Site<'_>) -> bool {
    c.element() == Element::C
        && c.bonds()
            .any(|(n, order)| order == 2 && n.element() == Element::N && n.charge() > 0)
}

/// A carbon carrying two terminal atoms of `element`, one of them anionic.
fn delocalized_anion_carbon(c: &Site<'_>, element: Element) -> bool {
    let terminal: Vec<_> = c
        .neighbors()
        .filter(|n| n.element() == element && n.is_terminal())
        .collect();
    terminal.len() == 2 && terminal.iter().any(|n| n.charge() < 0)
}

lazy_static! {
    static ref OXYGEN: Vec<Rule> = vec![
        rule("O+", |s| s.degree() == 3 && s.charge() > 0),
        // divalent
        rule("O=+", |s| s.degree() == 2 && s.env().double_bonds() > 0),
        rule("OH2", |s| s.degree() == 2 && s.env().neighbors.h == 2),
        rule("ONO2", |s| s.degree() == 2 && s.any_neighbor(Element::N, |n, _| n.env().terminal_oxygens >= 2)),
        rule("ON=O", |s| s.degree() == 2 && s.any_neighbor(Element::N, |n, _| n.env().double.o >= 1)),
        rule("OSO3", |s| s.degree() == 2 && s.any_neighbor(Element::S, |n, _| n.env().neighbors.o == 4)),
        rule("OSO2", |s| s.degree() == 2 && s.any_neighbor(Element::S, |n, _| n.env().neighbors.o == 3)),
        rule("OSO", |s| s.degree() == 2 && s.any_neighbor(Element::S, |n, _| n.env().neighbors.o == 2 && n.degree() == 3)),
        rule("OS=O", |s| s.degree() == 2 && s.any_neighbor(Element::S, |n, _| n.env().double.o >= 1)),
        rule("-OS", |s| s.degree() == 2 && s.env().neighbors.s > 0),
        rule("OPO3", |s| s.degree() == 2 && s.any_neighbor(Element::P, |n, _| n.env().neighbors.o == 4)),
        rule("OPO2", |s| s.degree() == 2 && s.any_neighbor(Element::P, |n, _| n.env().neighbors.o == 3)),
        rule("OPO", |s| s.degree() == 2 && s.any_neighbor(Element::P, |n, _| n.env().neighbors.o == 2)),
        rule("-OP", |s| s.degree() == 2 && s.env().neighbors.p > 0),
        rule("OC=O", |s| s.degree() == 2 && s.any_neighbor(Element::C, |c, _| c.env().double.o >= 1)),
        rule("OC=S", |s| s.degree() == 2 && s.any_neighbor(Element::C, |c, _| c.env().double.s >= 1)),
        rule("OC=N", |s| s.degree() == 2 && s.any_neighbor(Element::C, |c, _| c.env().double.n >= 1)),
        rule("OC=C", |s| s.degree() == 2 && s.any_neighbor(Element::C, |c, _| c.env().double.c >= 1)),
        rule("OR", |s| s.degree() == 2 && s.env().neighbors.c + s.env().neighbors.h == 2),
        rule("-O-", |s| s.degree() == 2),
        // terminal
        rule("O=+", |s| s.degree() == 1 && s.charge() > 0),
        rule("O3N", |s| s.degree() == 1 && s.any_neighbor(Element::N, |n, _| n.env().terminal_oxygens == 3)),
        rule("O2NO", |s| s.degree() == 1 && s.any_neighbor(Element::N, |n, _| n.env().terminal_oxygens == 2 && n.env().neighbors.o == 3)),
        rule("O2N", |s| s.degree() == 1 && s.any_neighbor(Element::N, |n, _| n.env().terminal_oxygens == 2)),
        rule("O=N", |s| s.degree() == 1 && s.any_neighbor(Element::N, |_, order| order == 2)),
        rule("OXN", |s| s.degree() == 1 && s.env().neighbors.n > 0),
        rule("O4CL", |s| s.degree() == 1 && s.any_neighbor(Element::Cl, |cl, _| cl.env().neighbors.o == 4)),
        rule("O4S", |s| s.degree() == 1 && s.any_neighbor(Element::S, |n, _| n.env().terminal_oxygens == 4)),
        rule("O3S", |s| s.degree() == 1 && s.any_neighbor(Element::S, |n, _| n.env().terminal_oxygens == 3)),
        rule("O2S", |s| s.degree() == 1 && s.any_neighbor(Element::S, |n, _| n.env().terminal_oxygens == 2)),
        rule("O=S=", |s| s.degree() == 1 && s.any_neighbor(Element::S, |n, order| order == 2 && n.env().double.c >= 1)),
        rule("O=S", |s| s.degree() == 1 && s.any_neighbor(Element::S, |_, order| order == 2)),
        rule("O-S", |s| s.degree() == 1 && s.env().neighbors.s > 0),
        rule("O4P", |s| s.degree() == 1 && s.any_neighbor(Element::P, |n, _| n.env().terminal_oxygens == 4)),
        rule("O3P", |s| s.degree() == 1 && s.any_neighbor(Element::P, |n, _| n.env().terminal_oxygens == 3)),
        rule("O2P", |s| s.degree() == 1 && s.any_neighbor(Element::P, |n, _| n.env().terminal_oxygens == 2)),
        rule("OP", |s| s.degree() == 1 && s.env().neighbors.p > 0),
        rule("O2CM", |s| s.degree() == 1 && s.any_neighbor(Element::C, |c, _| delocalized_anion_carbon(c, Element::O))),
        rule("OM2", |s| s.degree() == 1 && s.charge() < 0 && s.any_neighbor(Element::C, |c, _| c.env().double_bonds() > 0)),
        rule("OM", |s| s.degree() == 1 && s.charge() < 0),
        rule("O=CN", |s| s.degree() == 1 && s.any_neighbor(Element::C, |c, order| order == 2 && c.env().neighbors.n > 0)),
        rule("O=CO", |s| s.degree() == 1 && s.any_neighbor(Element::C, |c, order| order == 2 && c.env().single.o > 0)),
        rule("O=CR", |s| s.degree() == 1 && s.any_neighbor(Element::C, |c, order| order == 2 && c.env().neighbors.c + c.env().neighbors.h == 2)),
        rule("O=C", |s| s.degree() == 1 && s.any_neighbor(Element::C, |_, order| order == 2)),
    ];

    static ref NITROGEN: Vec<Rule> = vec![
        rule("N3OX", |s| s.degree() == 4 && s.env().terminal_oxygens > 0),
        rule("NR+", |s| s.degree() == 4),
        rule("NSP", |s| s.degree() == 1 && s.env().triple_bonds() > 0),
        rule("NAZT", |s| s.degree() == 1 && s.env().double.n > 0),
        rule("NR%", |s| s.degree() == 2 && s.env().triple_bonds() > 0),
        rule("=N=", |s| s.degree() == 2 && s.env().double_bonds() == 2),
        rule("NM", |s| s.degree() == 2 && s.charge() < 0 && s.env().double_bonds() == 0),
        rule("N=O", |s| s.degree() == 2 && s.env().double.o > 0),
        rule("NSO", |s| s.degree() == 2 && s.env().double.s > 0),
        rule("N=N", |s| s.degree() == 2 && s.env().double.n > 0),
        rule("N=C", |s| s.degree() == 2 && s.env().double.c > 0),
        rule("NO3", |s| s.degree() == 3 && s.env().neighbors.o == 3),
        rule("NO2", |s| s.degree() == 3 && s.env().terminal_oxygens == 2),
        rule("N2OX", |s| s.degree() == 3 && s.env().terminal_oxygens == 1 && s.env().double_bonds() > 0),
        rule("NGD+", |s| s.degree() == 3 && s.any_neighbor(Element::C, |c, _| c.env().neighbors.n == 3 && cationic_carbon(c))),
        rule("NCN+", |s| s.degree() == 3 && s.any_neighbor(Element::C, |c, _| c.env().neighbors.n == 2 && cationic_carbon(c))),
        rule("N+=C", |s| s.degree() == 3 && s.charge() > 0 && s.env().double.c > 0),
        rule("N+=N", |s| s.degree() == 3 && s.charge() > 0 && s.env().double.n > 0),
        rule("NSO3", |s| s.degree() == 3 && s.any_neighbor(Element::S, |n, _| n.env().neighbors.o >= 3)),
        rule("NSO2", |s| s.degree() == 3 && s.any_neighbor(Element::S, |n, _| n.env().terminal_oxygens >= 2)),
        rule("NPO3", |s| s.degree() == 3 && s.any_neighbor(Element::P, |n, _| n.env().neighbors.o >= 3)),
        rule("NPO2", |s| s.degree() == 3 && s.any_neighbor(Element::P, |n, _| n.env().terminal_oxygens >= 2)),
        rule("NC=O", |s| s.degree() == 3 && s.any_neighbor(Element::C, |c, _| c.env().double.o > 0)),
        rule("NC=S", |s| s.degree() == 3 && s.any_neighbor(Element::C, |c, _| c.env().double.s > 0)),
        rule("NN=C", |s| s.degree() == 3 && s.any_neighbor(Element::N, |n, _| n.env().double.c > 0)),
        rule("NN=N", |s| s.degree() == 3 && s.any_neighbor(Element::N, |n, _| n.env().double.n > 0)),
        rule("NC=N", |s| s.degree() == 3 && s.any_neighbor(Element::C, |c, _| c.env().double.n > 0)),
        rule("NC=C", |s| s.degree() == 3 && s.any_neighbor(Element::C, |c, _| c.env().double.c > 0)),
        rule("NC=P", |s| s.degree() == 3 && s.any_neighbor(Element::C, |c, _| c.env().double.p > 0)),
        rule("NC%C", |s| s.degree() == 3 && s.any_neighbor(Element::C, |c, _| c.env().triple.c > 0)),
        rule("NC%N", |s| s.degree() == 3 && s.any_neighbor(Element::C, |c, _| c.env().triple.n > 0)),
        rule("NR", |s| s.degree() == 3),
    ];

    static ref SULFUR: Vec<Rule> = vec![
        rule("S2CM", |s| s.degree() == 1 && s.any_neighbor(Element::C, |c, _| delocalized_anion_carbon(c, Element::S))),
        rule("SM", |s| s.degree() == 1 && s.charge() < 0),
        rule("S-P", |s| s.degree() == 1 && s.env().neighbors.p > 0),
        rule("S=C", |s| s.degree() == 1 && s.env().double.c > 0),
        rule("=S=O", |s| s.degree() == 2 && s.env().double.o > 0 && s.env().double.c > 0),
        rule("S", |s| s.degree() == 2),
        rule("=SO2", |s| s.degree() == 3 && s.env().terminal_oxygens == 2 && s.env().double.c > 0),
        rule("SO2M", |s| s.degree() == 3 && s.env().terminal_oxygens == 2),
        rule(">S=N", |s| s.degree() == 3 && s.env().double.n > 0),
        rule("S=O", |s| s.degree() == 3 && s.env().double.o > 0),
        rule("SO4", |s| s.degree() == 4 && s.env().neighbors.o == 4),
        rule("SO3", |s| s.degree() == 4 && s.env().neighbors.o == 3),
        rule("SO2N", |s| s.degree() == 4 && s.env().terminal_oxygens == 2 && s.env().neighbors.n > 0),
        rule("SO2", |s| s.degree() == 4 && s.env().terminal_oxygens == 2),
        rule("SNO", |s| s.degree() == 4 && s.env().terminal_oxygens == 1 && s.env().double.n > 0),
    ];

    static ref PHOSPHORUS: Vec<Rule> = vec![
        rule("PO4", |s| s.degree() == 4 && s.env().neighbors.o == 4),
        rule("PO3", |s| s.degree() == 4 && s.env().neighbors.o == 3),
        rule("PO2", |s| s.degree() == 4 && s.env().neighbors.o == 2),
        rule("PO", |s| s.degree() == 4 && s.env().neighbors.o == 1),
        rule("PTET", |s| s.degree() == 4),
        rule("-P=C", |s| s.degree() == 2 && s.env().double.c > 0),
        rule("P", |s| s.degree() == 3),
    ];

    static ref CARBON: Vec<Rule> = vec![
        rule("CR3R", |s| s.degree() == 4 && s.in_ring(3)),
        rule("CR4R", |s| s.degree() == 4 && s.in_ring(4)),
        rule("CR", |s| s.degree() == 4),
        rule("C%-", |s| s.degree() == 1 && s.env().triple_bonds() > 0),
        rule("=C=", |s| s.degree() == 2 && s.env().double_bonds() == 2),
        rule("CSP", |s| s.degree() == 2 && s.env().triple_bonds() > 0),
        rule("CO2M", |s| s.degree() == 3 && delocalized_anion_carbon(s, Element::O)),
        rule("CS2M", |s| s.degree() == 3 && delocalized_anion_carbon(s, Element::S)),
        rule("CGD+", |s| s.degree() == 3 && s.env().neighbors.n == 3 && cationic_carbon(s)),
        rule("CNN+", |s| s.degree() == 3 && s.env().neighbors.n == 2 && cationic_carbon(s)),
        rule("CGD", |s| s.degree() == 3 && s.env().neighbors.n == 3 && s.env().double.n > 0),
        rule("CONN", |s| s.degree() == 3 && s.env().double.o > 0 && s.env().neighbors.n == 2),
        rule("COON", |s| s.degree() == 3 && s.env().double.o > 0 && s.env().neighbors.n == 1 && s.oxy_links() >= 1),
        rule("COOO", |s| s.degree() == 3 && s.env().double.o > 0 && s.oxy_links() >= 2),
        rule("COO", |s| s.degree() == 3 && s.env().double.o > 0 && s.oxy_links() >= 1),
        rule("C=ON", |s| s.degree() == 3 && s.env().double.o > 0 && s.env().neighbors.n > 0),
        rule("C=OS", |s| s.degree() == 3 && s.env().double.o > 0 && s.env().single.s > 0),
        rule("C=OR", |s| s.degree() == 3 && s.env().double.o > 0 && s.env().neighbors.c + s.env().neighbors.h == 2),
        rule("C=O", |s| s.degree() == 3 && s.env().double.o > 0),
        rule("CSO2", |s| s.degree() == 3 && s.any_neighbor(Element::S, |n, order| order == 2 && n.env().terminal_oxygens == 2)),
        rule("CS=O", |s| s.degree() == 3 && s.any_neighbor(Element::S, |n, order| order == 2 && n.env().terminal_oxygens == 1)),
        rule("CSS", |s| s.degree() == 3 && s.env().double.s > 0 && s.env().single.s > 0),
        rule("C=SN", |s| s.degree() == 3 && s.env().double.s > 0 && s.env().neighbors.n > 0),
        rule("C=S", |s| s.degree() == 3 && s.env().double.s > 0),
        rule("CE4R", |s| s.degree() == 3 && s.double_partner().is_some_and(|p| p.element() == Element::C && s.shares_ring(&p, 4))),
        rule("C=C", |s| s.degree() == 3 && s.env().double.c > 0),
        rule("C=N", |s| s.degree() == 3 && s.env().double.n > 0),
        rule("C=P", |s| s.degree() == 3 && s.env().double.p > 0),
        rule("CSP2", |s| s.degree() == 3 && s.env().double_bonds() > 0),
    ];

    /// Hydrogen symbols keyed by the final symbol of a non-carbon parent.
    static ref HYDROGEN_ON: HashMap<&'static str, &'static str> = [
        ("OR", "HOR"), ("OC=O", "HOCO"), ("OC=C", "HOCC"), ("OC=N", "HOCN"), ("OC=S", "HOCO"),
        ("OH2", "HOH"), ("OM", "HOM"), ("O+", "HO+"), ("O=+", "HO=+"),
        ("OSO3", "HOS"), ("OSO2", "HOS"), ("OSO", "HOS"), ("OS=O", "HOS"), ("-OS", "HOS"),
        ("OPO3", "HOP"), ("OPO2", "HOP"), ("OPO", "HOP"), ("-OP", "HOP"), ("-O-", "HO"),
        ("NR", "HNR"), ("NR+", "HNR+"), ("N+=C", "HNC+"), ("NCN+", "HNC+"), ("N+=N", "HNN+"),
        ("NGD+", "HGD+"), ("NPD+", "HPD+"), ("NIM+", "HIM+"),
        ("N5+", "HN5+"), ("N5A+", "HN5+"), ("N5B+", "HN5+"),
        ("NPYL", "HPYL"), ("NC=O", "HNCO"), ("NC=S", "HNCS"), ("NC=C", "HNCC"), ("NC=N", "HNCN"),
        ("NN=C", "HNNC"), ("NN=N", "HNNN"), ("NSO2", "HNSO"), ("NSO3", "HNSO"),
        ("NPO2", "HNPO"), ("NPO3", "HNPO"), ("NC%C", "HNC%"), ("N=C", "HN=C"), ("N=N", "HN=N"),
        ("NM", "HNM"), ("N2OX", "HNOX"), ("N3OX", "HNOX"),
        ("S", "HS"), ("P", "HP"), ("SI", "HSI"), ("SIC3", "HSI"),
    ]
    .into_iter()
    .collect();
}

/// The rule table for `element`, if typing has one.
pub fn rules_for(element: Element) -> Option<&'static [Rule]> {
    match element {
        Element::O => Some(OXYGEN.as_slice()),
        Element::N => Some(NITROGEN.as_slice()),
        Element::S => Some(SULFUR.as_slice()),
        Element::P => Some(PHOSPHORUS.as_slice()),
        Element::C => Some(CARBON.as_slice()),
        _ => None,
    }
}

/// The symbol of the first rule in `rules` that `site` satisfies.
pub fn first_match(rules: &[Rule], site: &Site<'_>) -> Option<&'static str> {
    rules.iter().find(|r| (r.matches)(site)).map(|r| r.symbol)
}

/// Fallback for carbons no rule describes, refined by what they touch.
pub fn generic_carbon(site: &Site<'_>) -> &'static str {
    let env = site.env();
    let halogen = env.neighbors.halogen > 0;
    let hetero = env.neighbors.hetero() > 0;
    match (halogen, hetero) {
        (true, true) => "CGENXH",
        (true, false) => "CGENX",
        (false, true) => "CGENH",
        (false, false) => "CGEN",
    }
}

/// Provisional symbol for hydrogen, silicon and the halogens.
pub fn simple_symbol(site: &Site<'_>) -> Option<&'static str> {
    let env = site.env();
    match site.element() {
        Element::H if env.degree == 1 => Some(if env.neighbors.o > 0 {
            "HO"
        } else if env.neighbors.n > 0 {
            "HN"
        } else if env.neighbors.p > 0 {
            "HP"
        } else if env.neighbors.s > 0 {
            "HS"
        } else if env.neighbors.si > 0 {
            "HSI"
        } else {
            "HC"
        }),
        Element::Si if env.neighbors.c == 3 => Some("SIC3"),
        Element::Si => Some("SI"),
        Element::F => Some("F"),
        Element::Cl if env.neighbors.o == 4 => Some("CLO4"),
        Element::Cl => Some("CL"),
        Element::Br => Some("BR"),
        Element::I => Some("I"),
        _ => None,
    }
}

/// Final hydrogen symbol given the final symbol of its parent atom.
pub fn hydrogen_symbol(parent_element: Element, parent_symbol: &str) -> Option<&'static str> {
    if parent_element == Element::C {
        return Some("HC");
    }
    HYDROGEN_ON.get(parent_symbol).copied()
}
