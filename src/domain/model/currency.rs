//! Currencies a plan can be priced in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! currencies {
    ($($variant:ident => $code:literal),+ $(,)?) => {
        /// ISO 4217 currency of a plan.
        ///
        /// `Unspecified` is the zero value: it is what a request carries when no
        /// currency was chosen, and what an unknown provider token decodes to.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
        #[serde(rename_all = "UPPERCASE")]
        pub enum Currency {
            #[default]
            Unspecified,
            $($variant,)+
        }

        impl Currency {
            /// Every currency except `Unspecified`.
            pub const ALL: &'static [Currency] = &[$(Currency::$variant,)+];

            /// Upper-case ISO 4217 code, or `""` for `Unspecified`.
            pub fn iso_code(self) -> &'static str {
                match self {
                    Currency::Unspecified => "",
                    $(Currency::$variant => $code,)+
                }
            }
        }
    };
}

currencies! {
    Usd => "USD", Aed => "AED", Afn => "AFN", All => "ALL", Amd => "AMD",
    Ang => "ANG", Aoa => "AOA", Ars => "ARS", Aud => "AUD", Awg => "AWG",
    Azn => "AZN", Bam => "BAM", Bbd => "BBD", Bdt => "BDT", Bgn => "BGN",
    Bif => "BIF", Bmd => "BMD", Bnd => "BND", Bob => "BOB", Brl => "BRL",
    Bsd => "BSD", Bwp => "BWP", Bzd => "BZD", Cad => "CAD", Cdf => "CDF",
    Chf => "CHF", Clp => "CLP", Cny => "CNY", Cop => "COP", Crc => "CRC",
    Cve => "CVE", Czk => "CZK", Djf => "DJF", Dkk => "DKK", Dop => "DOP",
    Dzd => "DZD", Egp => "EGP", Etb => "ETB", Eur => "EUR", Fjd => "FJD",
    Fkp => "FKP", Gbp => "GBP", Gel => "GEL", Gip => "GIP", Gmd => "GMD",
    Gnf => "GNF", Gtq => "GTQ", Gyd => "GYD", Hkd => "HKD", Hnl => "HNL",
    Hrk => "HRK", Htg => "HTG", Huf => "HUF", Idr => "IDR", Ils => "ILS",
    Inr => "INR", Isk => "ISK", Jmd => "JMD", Jpy => "JPY", Kes => "KES",
    Kgs => "KGS", Khr => "KHR", Kmf => "KMF", Krw => "KRW", Kyd => "KYD",
    Kzt => "KZT", Lak => "LAK", Lbp => "LBP", Lkr => "LKR", Lrd => "LRD",
    Lsl => "LSL", Mad => "MAD", Mdl => "MDL", Mga => "MGA", Mkd => "MKD",
    Mmk => "MMK", Mnt => "MNT", Mop => "MOP", Mro => "MRO", Mur => "MUR",
    Mvr => "MVR", Mwk => "MWK", Mxn => "MXN", Myr => "MYR", Mzn => "MZN",
    Nad => "NAD", Ngn => "NGN", Nio => "NIO", Nok => "NOK", Npr => "NPR",
    Nzd => "NZD", Pab => "PAB", Pen => "PEN", Pgk => "PGK", Php => "PHP",
    Pkr => "PKR", Pln => "PLN", Pyg => "PYG", Qar => "QAR", Ron => "RON",
    Rsd => "RSD", Rub => "RUB", Rwf => "RWF", Sar => "SAR", Sbd => "SBD",
    Scr => "SCR", Sek => "SEK", Sgd => "SGD", Shp => "SHP", Sll => "SLL",
    Sos => "SOS", Srd => "SRD", Std => "STD", Svc => "SVC", Szl => "SZL",
    Thb => "THB", Tjs => "TJS", Top => "TOP", Try => "TRY", Ttd => "TTD",
    Twd => "TWD", Tzs => "TZS", Uah => "UAH", Ugx => "UGX", Uyu => "UYU",
    Uzs => "UZS", Vnd => "VND", Vuv => "VUV", Wst => "WST", Xaf => "XAF",
    Xcd => "XCD", Xof => "XOF", Xpf => "XPF", Yer => "YER", Zar => "ZAR",
    Zmw => "ZMW",
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Unspecified => write!(f, "UNSPECIFIED"),
            other => write!(f, "{}", other.iso_code()),
        }
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .iter()
            .copied()
            .find(|c| c.iso_code().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Unknown currency: {}. Expected an ISO 4217 code such as USD.", s))
    }
}
