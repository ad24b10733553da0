use std::fs;
use std::path::PathBuf;

use fwconv::engine::{convert, ConvertError};
use fwconv::parse;
use fwconv::registry::builtin;
use fwconv::stats::{summarize, ConversionStats};
use fwconv::vendor::VendorId;
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).expect("read fixture")
}

fn sample(vendor: VendorId) -> String {
    match vendor {
        VendorId::CiscoAsa => fixture("asa.cfg"),
        VendorId::CiscoFtd => fixture("ftd.cfg"),
        VendorId::Fortigate => fixture("fortigate.conf"),
        VendorId::PaloAlto => fixture("paloalto.xml"),
    }
}

const SCENARIO_A: &str = "hostname fw1\ninterface Gi0/1\n nameif inside\n ip address 10.0.0.1 255.255.255.0\n security-level 100\n!";

#[test]
fn every_supported_pair_converts_its_fixture() {
    let pairs = builtin().supported_pairs();
    assert_eq!(pairs.len(), 12);
    for (source, target, complexity) in pairs {
        let text = sample(source);
        let conversion = convert(&text, source.as_str(), target.as_str())
            .unwrap_or_else(|failure| panic!("{source} -> {target}: {failure}"));
        assert_eq!(conversion.complexity, complexity);
        assert_eq!(conversion.stats, summarize(&conversion.model));
        assert!(conversion.stats.total() > 0, "{source} fixture parsed to nothing");
        assert!(!conversion.output.trim().is_empty());
        assert!(
            conversion.output.contains(source.display_name()),
            "{source} -> {target}: origin missing from header"
        );
    }
}

#[test]
fn absent_pairs_fail_regardless_of_input() {
    for source in VendorId::ALL {
        for target in VendorId::ALL {
            if builtin().conversion(source, target).is_some() {
                continue;
            }
            for text in ["", "hostname fw1\n", SCENARIO_A] {
                let failure = convert(text, source.as_str(), target.as_str()).unwrap_err();
                assert!(matches!(
                    failure.error,
                    ConvertError::UnsupportedConversion { .. }
                ));
            }
        }
    }
}

#[test]
fn scenario_a_parses_one_named_interface() {
    let model = parse::asa::parse(SCENARIO_A);
    assert_eq!(model.hostname.as_deref(), Some("fw1"));
    assert_eq!(model.interfaces.len(), 1);
    let interface = &model.interfaces[0];
    assert_eq!(interface.name, "Gi0/1");
    assert_eq!(interface.description.as_deref(), Some("inside"));
    assert_eq!(interface.ip.as_deref(), Some("10.0.0.1"));
    assert_eq!(interface.mask.as_deref(), Some("255.255.255.0"));
    assert_eq!(interface.security_level, Some(100));
}

#[test]
fn scenario_b_emits_fortigate_interface_block() {
    let conversion = convert(SCENARIO_A, "cisco-asa", "fortigate").unwrap();
    let output = &conversion.output;
    assert!(output.contains("edit \"Gi0/1\""));
    assert!(output.contains("set ip 10.0.0.1 255.255.255.0"));
    assert!(output.contains("set alias \"inside\""));
}

#[test]
fn scenario_c_self_conversion_fails() {
    let failure = convert(&fixture("fortigate.conf"), "fortigate", "fortigate").unwrap_err();
    assert_eq!(
        failure.to_string(),
        "conversion from fortigate to fortigate is not supported"
    );
    assert_eq!(failure.source_vendor_name.as_deref(), Some("FortiGate"));
}

#[test]
fn scenario_d_empty_input_yields_zero_stats() {
    for (source, target, _) in builtin().supported_pairs() {
        let conversion = convert("", source.as_str(), target.as_str()).unwrap();
        assert_eq!(conversion.stats, ConversionStats::default());
        assert_eq!(conversion.model, Default::default());
    }
}

#[test]
fn interface_count_follows_blocks() {
    for n in [0usize, 1, 3, 7] {
        let text: String = (0..n)
            .map(|i| format!("interface Gi0/{i}\n nameif if{i}\n ip address 10.{i}.0.1 255.255.255.0\n!\n"))
            .collect();
        let conversion = convert(&text, "cisco-asa", "palo-alto").unwrap();
        assert_eq!(conversion.model.interfaces.len(), n);
        assert_eq!(conversion.stats.interfaces, n);
    }
}

#[test]
fn empty_categories_leave_no_section_headers() {
    let cisco = convert("", "fortigate", "cisco-asa").unwrap().output;
    for header in ["interface ", "object ", "access-list", "route ", "nat ", "crypto ", "username "] {
        assert!(
            !cisco.lines().any(|l| l.starts_with(header)),
            "unexpected {header:?} in {cisco}"
        );
    }

    let forti = convert("", "cisco-asa", "fortigate").unwrap().output;
    let sections: Vec<&str> = forti.lines().filter(|l| l.starts_with("config ")).collect();
    assert_eq!(sections, vec!["config system global"]);

    let pan = convert("", "cisco-asa", "palo-alto").unwrap().output;
    for tag in ["<network>", "<zone>", "<rulebase>", "<address>", "<mgt-config>"] {
        assert!(!pan.contains(tag), "unexpected {tag} in {pan}");
    }
}

#[test]
fn panos_output_is_well_formed_and_reparses() {
    for source in [VendorId::CiscoAsa, VendorId::CiscoFtd, VendorId::Fortigate] {
        let conversion = convert(&sample(source), source.as_str(), "palo-alto").unwrap();
        let root = fwconv_xml::parse(&conversion.output).expect("generated XML parses");
        assert_eq!(root.tag, "config");

        let reparsed = parse::paloalto::parse(&conversion.output);
        assert_eq!(
            reparsed.interfaces.len(),
            conversion.model.interfaces.len(),
            "{source} interfaces lost in PAN-OS output"
        );
        assert_eq!(reparsed.hostname, conversion.model.hostname);
    }
}

#[test]
fn asa_fixture_round_trips_through_fortigate() {
    let asa = convert(&fixture("asa.cfg"), "cisco-asa", "fortigate").unwrap();
    let forti = parse::fortigate::parse(&asa.output);
    assert_eq!(forti.hostname.as_deref(), Some("edge-asa"));
    assert_eq!(forti.interfaces.len(), 2);
    assert_eq!(forti.interfaces[1].description.as_deref(), Some("inside"));
    for object in &asa.model.address_objects {
        assert!(
            forti.address_object(&object.name).is_some(),
            "{} missing from FortiGate output",
            object.name
        );
    }
    assert_eq!(forti.routes.len(), 1);
}

#[test]
fn fortigate_fixture_keeps_names_in_asa_output() {
    let conversion = convert(&fixture("fortigate.conf"), "fortigate", "cisco-asa").unwrap();
    let asa = parse::asa::parse(&conversion.output);
    assert_eq!(asa.hostname.as_deref(), Some("FGT-EDGE"));
    assert_eq!(asa.interfaces.len(), 2);
    let names: Vec<_> = asa.address_objects.iter().map(|o| o.name.as_str()).collect();
    assert!(names.contains(&"web-server"));
    assert!(names.contains(&"lan-net"));
    assert!(conversion.output.contains("! not converted:"));
}
