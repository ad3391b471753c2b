//! Place-name suggestions for the interactive province picker.

/// Thai provinces, spelled the way the weather service resolves them.
pub const THAI_PROVINCES: [&str; 77] = [
    "Bangkok",
    "Amnat Charoen",
    "Ang Thong",
    "Bueng Kan",
    "Buriram",
    "Chachoengsao",
    "Chai Nat",
    "Chaiyaphum",
    "Chanthaburi",
    "Chiang Mai",
    "Chiang Rai",
    "Chonburi",
    "Chumphon",
    "Kalasin",
    "Kamphaeng Phet",
    "Kanchanaburi",
    "Khon Kaen",
    "Krabi",
    "Lampang",
    "Lamphun",
    "Loei",
    "Lopburi",
    "Mae Hong Son",
    "Maha Sarakham",
    "Mukdahan",
    "Nakhon Nayok",
    "Nakhon Pathom",
    "Nakhon Phanom",
    "Nakhon Ratchasima",
    "Nakhon Sawan",
    "Nakhon Si Thammarat",
    "Nan",
    "Narathiwat",
    "Nong Bua Lamphu",
    "Nong Khai",
    "Nonthaburi",
    "Pathum Thani",
    "Pattani",
    "Phang Nga",
    "Phatthalung",
    "Phayao",
    "Phetchabun",
    "Phetchaburi",
    "Phichit",
    "Phitsanulok",
    "Phra Nakhon Si Ayutthaya",
    "Phrae",
    "Phuket",
    "Prachinburi",
    "Prachuap Khiri Khan",
    "Ranong",
    "Ratchaburi",
    "Rayong",
    "Roi Et",
    "Sa Kaeo",
    "Sakon Nakhon",
    "Samut Prakan",
    "Samut Sakhon",
    "Samut Songkhram",
    "Saraburi",
    "Satun",
    "Sing Buri",
    "Sisaket",
    "Songkhla",
    "Sukhothai",
    "Suphan Buri",
    "Surat Thani",
    "Surin",
    "Tak",
    "Trang",
    "Trat",
    "Ubon Ratchathani",
    "Udon Thani",
    "Uthai Thani",
    "Uttaradit",
    "Yala",
    "Yasothon",
];

/// Provinces matching `input`, case-insensitively.
///
/// Prefix matches come first, then names containing the input elsewhere;
/// both groups keep list order. Blank input matches everything.
pub fn suggest(input: &str, limit: usize) -> Vec<&'static str> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return THAI_PROVINCES.iter().copied().take(limit).collect();
    }

    let (prefix, rest): (Vec<&'static str>, Vec<&'static str>) = THAI_PROVINCES
        .iter()
        .copied()
        .filter(|name| name.to_lowercase().contains(&needle))
        .partition(|name| name.to_lowercase().starts_with(&needle));

    prefix.into_iter().chain(rest).take(limit).collect()
}

/// Exact (case-insensitive) match against the province list.
pub fn canonical_name(input: &str) -> Option<&'static str> {
    let needle = input.trim();
    THAI_PROVINCES
        .iter()
        .copied()
        .find(|name| name.eq_ignore_ascii_case(needle))
}
