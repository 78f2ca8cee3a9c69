use super::Region;

pub(super) const REGIONS: &[(Region, &[&str])] = &[
    (Region::NorthAmerica, &["US", "CA", "BM", "GL", "PM"]),
    (
        Region::LatinAmerica,
        &[
            "MX", "GT", "BZ", "SV", "HN", "NI", "CR", "PA", "CU", "JM", "HT", "DO", "PR", "BS",
            "BB", "TT", "AG", "DM", "GD", "KN", "LC", "VC", "AI", "AW", "KY", "MS", "TC", "VG",
            "VI", "CW", "SX", "BQ", "AN", "GP", "MQ", "MF", "BL", "CO", "VE", "GY", "SR", "GF",
            "EC", "PE", "BR", "BO", "PY", "CL", "AR", "UY", "FK", "GS",
        ],
    ),
    (
        Region::EuropeCentralAsia,
        &[
            "AX", "AL", "AD", "AM", "AT", "AZ", "BY", "BE", "BA", "BG", "HR", "CY", "CZ", "DK",
            "EE", "FO", "FI", "FR", "GE", "DE", "GI", "GR", "GG", "HU", "IS", "IE", "IM", "IT",
            "JE", "KZ", "KG", "LV", "LI", "LT", "LU", "MK", "MT", "MD", "MC", "ME", "NL", "NO",
            "PL", "PT", "RO", "RU", "SM", "RS", "SK", "SI", "ES", "SJ", "SE", "CH", "TJ", "TR",
            "TM", "UA", "GB", "UZ", "VA", "CS", "YU", "SU", "XK",
        ],
    ),
    (
        Region::MiddleEastNorthAfrica,
        &[
            "DZ", "BH", "DJ", "EG", "IR", "IQ", "IL", "JO", "KW", "LB", "LY", "MA", "OM", "PS",
            "QA", "SA", "SY", "TN", "AE", "YE", "EH", "CE",
        ],
    ),
    (
        Region::SubSaharanAfrica,
        &[
            "AO", "BJ", "BW", "BF", "BI", "CM", "CV", "CF", "TD", "KM", "CG", "CD", "CI", "GQ",
            "ER", "ET", "GA", "GM", "GH", "GN", "GW", "KE", "LS", "LR", "MG", "MW", "ML", "MR",
            "MU", "YT", "MZ", "NA", "NE", "NG", "RE", "RW", "SH", "ST", "SN", "SC", "SL", "SO",
            "ZA", "SS", "SD", "SZ", "TZ", "TG", "UG", "ZM", "ZW",
        ],
    ),
    (Region::SouthAsia, &["AF", "BD", "BT", "IN", "MV", "NP", "PK", "LK", "IO"]),
    (
        Region::EastAsiaPacific,
        &[
            "AS", "AU", "BN", "KH", "CN", "CX", "CC", "CK", "FJ", "PF", "GU", "HK", "ID", "JP",
            "KI", "KP", "KR", "LA", "MO", "MY", "MH", "FM", "MN", "MM", "NR", "NC", "NZ", "NU",
            "NF", "MP", "PW", "PG", "PH", "PN", "WS", "SG", "SB", "TW", "TH", "TL", "TK", "TO",
            "TV", "UM", "VU", "VN", "WF",
        ],
    ),
];
