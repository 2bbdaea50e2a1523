//! The catalog of known species.

/// One record of the species catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
pub struct Species {
    /// Short code, e.g., `hsa` or `hsapiens`.
    pub species: &'static str,
    /// Common name, possibly empty.
    pub common: &'static str,
    /// Scientific name, possibly empty.
    pub scientific: &'static str,
    /// Assembly name, possibly empty.
    pub assembly: &'static str,
}

impl Species {
    const fn new(
        species: &'static str,
        common: &'static str,
        scientific: &'static str,
        assembly: &'static str,
    ) -> Self {
        Self {
            species,
            common,
            scientific,
            assembly,
        }
    }

    const fn short(species: &'static str) -> Self {
        Self::new(species, "", "", "")
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.species, self.common, self.scientific, self.assembly
        )
    }
}

/// All known species, in catalog order.
pub static SPECIES: &[Species] = &[
    Species::new("hsa", "human", "Homo sapiens", "GRCh37.p7"),
    Species::new("mmu", "mouse", "Mus musculus", "NCBIM37"),
    Species::new("rno", "rat", "Rattus norvegicus", "RGSC 3.4"),
    Species::new("dre", "zebrafish", "Danio rerio", "Zv9"),
    Species::new("cel", "worm", "Caenorhabditis elegans", "WS230"),
    Species::new("dme", "fruitfly", "Drosophila melanogaster", "BDGP 5.39"),
    Species::new("sce", "yeast", "Saccharomyces cerevisiae", "EF 4"),
    Species::new("cfa", "dog", "Canis familiaris", "CanFam 2.0"),
    Species::new("ssc", "pig", "Sus scrofa", "Sscrofa10.2"),
    Species::new("aga", "mosquito", "Anopheles gambiae", "AgamP3"),
    Species::new("pfa", "malaria parasite", "Plasmodium falciparum", "3D7"),
    Species::short("hsapiens"),
    Species::short("mmusculus"),
    Species::short("rnorvegicus"),
    Species::short("ptroglodytes"),
    Species::short("ggorilla"),
    Species::short("pabelii"),
    Species::short("mmulatta"),
    Species::short("sscrofa"),
    Species::short("cfamiliaris"),
    Species::short("ecaballus"),
    Species::short("ocuniculus"),
    Species::short("ggallus"),
    Species::short("btaurus"),
    Species::short("fcatus"),
    Species::short("drerio"),
    Species::short("cintestinalis"),
    Species::short("dmelanogaster"),
    Species::short("dsimulans"),
    Species::short("dyakuba"),
    Species::short("agambiae"),
    Species::short("celegans"),
    Species::short("scerevisiae"),
    Species::short("spombe"),
    Species::short("afumigatus"),
    Species::short("aniger"),
    Species::short("anidulans"),
    Species::short("aoryzae"),
    Species::short("pfalciparum"),
    Species::short("lmajor"),
    Species::short("athaliana"),
    Species::short("alyrata"),
    Species::short("bdistachyon"),
    Species::short("osativa"),
    Species::short("gmax"),
    Species::short("vvinifera"),
    Species::short("zmays"),
];

/// Whether `species` names a catalog entry, ignoring case.
pub fn is_known(species: &str) -> bool {
    SPECIES
        .iter()
        .any(|entry| entry.species.eq_ignore_ascii_case(species))
}

/// Text rendering of the catalog, one record per line.
pub fn catalog_text() -> String {
    SPECIES.iter().map(|entry| format!("{}\n", entry)).collect()
}
