/// Land borders as unordered alpha-2 pairs. Adjacency is derived from this
/// list in both directions.
pub(super) const BORDERS: &[(&str, &str)] = &[
    // Europe
    ("AD", "ES"), ("AD", "FR"), ("AL", "ME"), ("AL", "XK"), ("AL", "MK"), ("AL", "GR"),
    ("AT", "DE"), ("AT", "CZ"), ("AT", "SK"), ("AT", "HU"), ("AT", "SI"), ("AT", "IT"),
    ("AT", "CH"), ("AT", "LI"), ("BA", "HR"), ("BA", "RS"), ("BA", "ME"), ("BE", "FR"),
    ("BE", "LU"), ("BE", "DE"), ("BE", "NL"), ("BG", "RO"), ("BG", "RS"), ("BG", "MK"),
    ("BG", "GR"), ("BG", "TR"), ("BY", "RU"), ("BY", "UA"), ("BY", "PL"), ("BY", "LT"),
    ("BY", "LV"), ("CH", "DE"), ("CH", "FR"), ("CH", "IT"), ("CH", "LI"), ("CZ", "DE"),
    ("CZ", "PL"), ("CZ", "SK"), ("DE", "DK"), ("DE", "PL"), ("DE", "FR"), ("DE", "LU"),
    ("DE", "NL"), ("EE", "LV"), ("EE", "RU"), ("ES", "FR"), ("ES", "PT"), ("ES", "GI"),
    ("FI", "SE"), ("FI", "NO"), ("FI", "RU"), ("FR", "LU"), ("FR", "IT"), ("FR", "MC"),
    ("GB", "IE"), ("GR", "MK"), ("GR", "TR"), ("HR", "SI"), ("HR", "HU"), ("HR", "RS"),
    ("HR", "ME"), ("HU", "SK"), ("HU", "UA"), ("HU", "RO"), ("HU", "RS"), ("HU", "SI"),
    ("IT", "SM"), ("IT", "VA"), ("IT", "SI"), ("LT", "LV"), ("LT", "PL"), ("LT", "RU"),
    ("LV", "RU"), ("MD", "RO"), ("MD", "UA"), ("ME", "RS"), ("ME", "XK"), ("MK", "RS"),
    ("MK", "XK"), ("NO", "SE"), ("NO", "RU"), ("PL", "SK"), ("PL", "UA"), ("PL", "RU"),
    ("RO", "RS"), ("RO", "UA"), ("RS", "XK"), ("SK", "UA"), ("UA", "RU"),
    // Caucasus and Central Asia
    ("AM", "GE"), ("AM", "AZ"), ("AM", "TR"), ("AM", "IR"), ("AZ", "GE"), ("AZ", "RU"),
    ("AZ", "IR"), ("AZ", "TR"), ("GE", "RU"), ("GE", "TR"), ("KZ", "RU"), ("KZ", "CN"),
    ("KZ", "KG"), ("KZ", "UZ"), ("KZ", "TM"), ("KG", "UZ"), ("KG", "TJ"), ("KG", "CN"),
    ("TJ", "UZ"), ("TJ", "AF"), ("TJ", "CN"), ("TM", "UZ"), ("TM", "AF"), ("TM", "IR"),
    ("UZ", "AF"),
    // Asia
    ("AF", "PK"), ("AF", "IR"), ("AF", "CN"), ("CN", "MN"), ("CN", "RU"), ("CN", "KP"),
    ("CN", "VN"), ("CN", "LA"), ("CN", "MM"), ("CN", "IN"), ("CN", "BT"), ("CN", "NP"),
    ("CN", "PK"), ("CN", "HK"), ("CN", "MO"), ("MN", "RU"), ("KP", "RU"), ("KP", "KR"),
    ("IN", "PK"), ("IN", "NP"), ("IN", "BT"), ("IN", "BD"), ("IN", "MM"), ("BD", "MM"),
    ("MM", "TH"), ("MM", "LA"), ("LA", "TH"), ("LA", "VN"), ("LA", "KH"), ("KH", "TH"),
    ("KH", "VN"), ("TH", "MY"), ("MY", "BN"), ("MY", "ID"), ("ID", "TL"), ("ID", "PG"),
    ("IR", "IQ"), ("IR", "TR"), ("IR", "PK"),
    // Middle East
    ("IQ", "TR"), ("IQ", "SY"), ("IQ", "JO"), ("IQ", "SA"), ("IQ", "KW"), ("SY", "TR"),
    ("SY", "LB"), ("SY", "JO"), ("SY", "IL"), ("LB", "IL"), ("IL", "JO"), ("IL", "EG"),
    ("IL", "PS"), ("JO", "PS"), ("JO", "SA"), ("SA", "KW"), ("SA", "QA"), ("SA", "AE"),
    ("SA", "OM"), ("SA", "YE"), ("OM", "AE"), ("OM", "YE"), ("EG", "PS"),
    // Africa
    ("EG", "LY"), ("EG", "SD"), ("LY", "TN"), ("LY", "DZ"), ("LY", "NE"), ("LY", "TD"),
    ("LY", "SD"), ("TN", "DZ"), ("DZ", "MA"), ("DZ", "EH"), ("DZ", "MR"), ("DZ", "ML"),
    ("DZ", "NE"), ("MA", "EH"), ("EH", "MR"), ("MR", "SN"), ("MR", "ML"), ("SN", "GM"),
    ("SN", "GW"), ("SN", "GN"), ("SN", "ML"), ("GW", "GN"), ("GN", "SL"), ("GN", "LR"),
    ("GN", "CI"), ("GN", "ML"), ("SL", "LR"), ("LR", "CI"), ("CI", "ML"), ("CI", "BF"),
    ("CI", "GH"), ("GH", "BF"), ("GH", "TG"), ("TG", "BF"), ("TG", "BJ"), ("BJ", "BF"),
    ("BJ", "NE"), ("BJ", "NG"), ("BF", "ML"), ("BF", "NE"), ("ML", "NE"), ("NE", "NG"),
    ("NE", "TD"), ("NG", "TD"), ("NG", "CM"), ("TD", "CM"), ("TD", "CF"), ("TD", "SD"),
    ("CM", "CF"), ("CM", "GQ"), ("CM", "GA"), ("CM", "CG"), ("GQ", "GA"), ("GA", "CG"),
    ("CG", "CF"), ("CG", "CD"), ("CG", "AO"), ("CF", "SD"), ("CF", "SS"), ("CF", "CD"),
    ("SD", "SS"), ("SD", "ER"), ("SD", "ET"), ("SS", "ET"), ("SS", "KE"), ("SS", "UG"),
    ("SS", "CD"), ("ER", "ET"), ("ER", "DJ"), ("ET", "DJ"), ("ET", "SO"), ("ET", "KE"),
    ("DJ", "SO"), ("SO", "KE"), ("KE", "UG"), ("KE", "TZ"), ("UG", "CD"), ("UG", "RW"),
    ("UG", "TZ"), ("RW", "CD"), ("RW", "BI"), ("RW", "TZ"), ("BI", "CD"), ("BI", "TZ"),
    ("TZ", "CD"), ("TZ", "ZM"), ("TZ", "MW"), ("TZ", "MZ"), ("CD", "ZM"), ("CD", "AO"),
    ("AO", "ZM"), ("AO", "NA"), ("ZM", "MW"), ("ZM", "MZ"), ("ZM", "ZW"), ("ZM", "BW"),
    ("ZM", "NA"), ("MW", "MZ"), ("MZ", "ZW"), ("MZ", "ZA"), ("MZ", "SZ"), ("ZW", "BW"),
    ("ZW", "ZA"), ("BW", "NA"), ("BW", "ZA"), ("NA", "ZA"), ("ZA", "LS"), ("ZA", "SZ"),
    // Americas
    ("CA", "US"), ("US", "MX"), ("MX", "GT"), ("MX", "BZ"), ("GT", "BZ"), ("GT", "HN"),
    ("GT", "SV"), ("HN", "SV"), ("HN", "NI"), ("NI", "CR"), ("CR", "PA"), ("PA", "CO"),
    ("CO", "VE"), ("CO", "BR"), ("CO", "PE"), ("CO", "EC"), ("EC", "PE"), ("PE", "BR"),
    ("PE", "BO"), ("PE", "CL"), ("BO", "BR"), ("BO", "PY"), ("BO", "AR"), ("BO", "CL"),
    ("CL", "AR"), ("AR", "PY"), ("AR", "BR"), ("AR", "UY"), ("UY", "BR"), ("PY", "BR"),
    ("VE", "GY"), ("VE", "BR"), ("GY", "SR"), ("GY", "BR"), ("SR", "GF"), ("SR", "BR"),
    ("GF", "BR"), ("HT", "DO"),
];
