//! Reference catalogs mapping mnemonic codes to descriptive names.
//!
//! Primary is always the short mnemonic and secondary the descriptive name.
//! Seed rows are kept in their original order; propagation relies on it when
//! a descriptive name is shared by several mnemonics.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Domain ──────────────────────────────────────────────────────────────────

/// A classification domain. Each one has a code pair in the composite log and
/// its own catalog table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
  Lithology,
  Structure,
  Alteration,
}

impl Domain {
  pub const ALL: [Domain; 3] = [Domain::Lithology, Domain::Structure, Domain::Alteration];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Lithology => "lithology",
      Self::Structure => "structure",
      Self::Alteration => "alteration",
    }
  }

  /// Name of the catalog table.
  pub fn catalog_table(self) -> &'static str {
    match self {
      Self::Lithology => "lithology_ref",
      Self::Structure => "structure_ref",
      Self::Alteration => "alteration_ref",
    }
  }

  /// `(primary, secondary)` column names inside the catalog table.
  pub fn catalog_columns(self) -> (&'static str, &'static str) {
    match self {
      Self::Lithology => ("litho_1", "litho_2"),
      Self::Structure => ("structure_1", "structure_2"),
      Self::Alteration => ("alt_1", "alt_2"),
    }
  }

  /// `(primary, secondary)` column names inside the composite log table.
  pub fn log_columns(self) -> (&'static str, &'static str) {
    match self {
      Self::Lithology => ("litho_1", "litho_2"),
      Self::Structure => ("struc_1", "struc_2"),
      Self::Alteration => ("alt_1", "alt_2"),
    }
  }

  /// The fixed seed vocabulary for this domain.
  pub fn seed(self) -> &'static [SeedEntry] {
    match self {
      Self::Lithology => LITHOLOGY,
      Self::Structure => STRUCTURE,
      Self::Alteration => ALTERATION,
    }
  }
}

impl fmt::Display for Domain {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Domain {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "litho" | "lithology" => Ok(Self::Lithology),
      "struc" | "structure" => Ok(Self::Structure),
      "alt" | "alteration" => Ok(Self::Alteration),
      _ => Err(Error::UnknownDomain(s.to_owned())),
    }
  }
}

// ─── Entries ─────────────────────────────────────────────────────────────────

/// One row of a catalog table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
  pub primary:   String,
  pub secondary: String,
  pub remarks:   String,
}

/// `(primary, secondary, remarks)` as embedded in the binary.
pub type SeedEntry = (&'static str, &'static str, &'static str);

impl From<&SeedEntry> for CatalogEntry {
  fn from((primary, secondary, remarks): &SeedEntry) -> Self {
    Self {
      primary:   (*primary).to_owned(),
      secondary: (*secondary).to_owned(),
      remarks:   (*remarks).to_owned(),
    }
  }
}

/// Seed entries of `domain` as owned catalog rows.
pub fn seed_entries(domain: Domain) -> Vec<CatalogEntry> {
  domain.seed().iter().map(CatalogEntry::from).collect()
}

// ─── Seed data ───────────────────────────────────────────────────────────────

pub const LITHOLOGY: &[SeedEntry] = &[
  ("OVER", "Overburden", "Overburden; transported soil or sidecasted waste"),
  ("PYCL", "Tuff", "Volcanic Rock - Tuff, crystal tuff, lithic tuff, lapili tuff, tuff breccia, volcanic breccia, volcaniclastics; andesitic tuff, dacitic tuff embedded in a tuffaceous matrix (fine-grained to crystal-phyric generally with sharp contact with composition from dacite to andesite to basalt)."),
  ("IDAC", "Dacite", "Shallow intrusive complex; Dacite; comprises with moderately (40%) abundant phenocrysts of plagioclase and hornblende."),
  ("ANFL", "Andesite", "Volcanic Rock - Andesite; extrusive andesite flow, trachytic andesite; fine-grained to feldspar-phyric porphyritic texture; dense sericite alteration replacement occurs along plagioclase phenocrysts."),
  ("DBRX", "Diatreme Breccia", "Diatreme Breccia - poorly sorted, rounded to subrounded heterolithic clasts of older rock units with varying sizes (millimeter to meters sizes) consisting of stratified but disorientated tuffaceous sedimentary rocks, pyroclastic fallout and breccias, diorite and limestone within a fine ash-rich, tuffaceous sedimentary matrix. "),
  ("DIO", "Diorite", "Intrusive Complex; Diorite, Quartz Diorite, and Microdiorite; medium to coarse grained; plagioclase-phyric; pervasively altered to sercite-illite with fine-grained tourmaline. "),
  ("IPYA", "Intrusive Porphyritic Andesite", "Intrusive complex (?); massive to moderately abundant phenocrysts in fine-grained groundmass inferred to have formed as hypabyssal dikes."),
  ("LMS", "Limestone", "Sedimentary rock - Limestone described as sequence of bedded calcareous mudstone-siltstone-sandstone-conglomerate intercalated with limestone."),
  ("BX1", "BX1", "Early hydrothermal brecciation event from a deeper diorite intrusion? Composed of silicified and argillized volcanic rocks with subhedral relict phenocrysts cemented by grey quartz, crisscrossed by minimal hairline quartz stockworks."),
  ("BX2", "BX2", "Related to high level dacite intrusions? Composed of the following classes (VNQ, VNB, VNX)"),
  ("BX3", "BX3", "Late hydrothermal explosion events after BX2? Multistage brecciation composed of BX1 and BX2 with altered breccia matrix and silica cement."),
  ("QSX1", "QSX1", "BX1 overprinted with mm-cm size veinlets or quartz stockworks."),
  ("QSW", "QSW", "Quartz stockworks mm-cm size in volcanic rocks."),
  ("VNQ", "VNQ", "Massive Quartz Vein - open space infills of milky quartz"),
  ("VNB", "VNB", "Banded Quartz Vein - colloform to crustiform banding with notable ginguro bands"),
  ("VNX", "VNX", "Quartz Vein Breccia - clasts composed of BX1 and volcanic rocks."),
  ("CSW", "CSW", "Calcite Stockworks"),
  ("CVN", "CVN", "Calcite Banded to Massive Veins"),
];

pub const STRUCTURE: &[SeedEntry] = &[
  ("FLT", "Fault", "Fault (Normal, Reverse, S-S)"),
  ("BED", "Bedding", "Bedding"),
  ("JNT", "Joint", "Joint"),
  ("VEN", "Vein", "Vein"),
  ("SHR", "Shear", "Shear Zone"),
  ("FZB", "Fault Breccia", "Fault Zone Breccia"),
  ("LIN", "Lineations", ""),
  ("CRN", "Crenulation", ""),
  ("BND", "Banding", "Banding/Platy Alignment"),
  ("FOL", "Foliation", ""),
  ("CAV", "Cavity", "Cavities (previous tunnelway or karst)"),
];

pub const ALTERATION: &[SeedEntry] = &[
  ("AA", "Argillic", "Advance Argillic"),
  ("AR", "Argillic", "Argillic"),
  ("CH", "Chloritic", "Chloritized"),
  ("IA", "Argillic", "Intermediate Argillic"),
  ("SR", "Sericitic", "Sericitic"),
  ("PR", "Propylitic", "Propylitic"),
  ("PT", "Potassic", "Potassic"),
  ("SI", "Silicic", "Silicic"),
  ("UA", "Unaltered", "Unaltered"),
  ("OX", "Oxidized", "Oxidized Zone"),
  ("HM", "Hematitic", "Hematite"),
];

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn seed_sizes() {
    assert_eq!(LITHOLOGY.len(), 18);
    assert_eq!(STRUCTURE.len(), 11);
    assert_eq!(ALTERATION.len(), 11);
  }

  #[test]
  fn primary_codes_are_unique_within_each_catalog() {
    for domain in Domain::ALL {
      let seen: HashSet<_> = domain.seed().iter().map(|(p, _, _)| *p).collect();
      assert_eq!(seen.len(), domain.seed().len(), "{domain}");
    }
  }

  #[test]
  fn domain_parses_short_and_long_names() {
    assert_eq!("litho".parse::<Domain>().unwrap(), Domain::Lithology);
    assert_eq!("Structure".parse::<Domain>().unwrap(), Domain::Structure);
    assert_eq!("alt".parse::<Domain>().unwrap(), Domain::Alteration);
    assert!(matches!("mineral".parse::<Domain>(), Err(Error::UnknownDomain(_))));
  }
}
