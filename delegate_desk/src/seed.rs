//! The data the desk starts with when no desk file is given.

use chrono::NaiveDate;

use crate::config::*;

/// The number of delegates the campaign aims to secure.
pub const TARGET_VOTES: u32 = 450;

fn region(id: &str, name: &str, description: &str) -> Region {
    Region {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    }
}

pub fn regions() -> Vec<Region> {
    vec![
        region("reg-01", "Marmara Bölgesi", "Istanbul and surroundings, financial centre"),
        region("reg-02", "İç Anadolu Bölgesi", "The capital and administrative coordination"),
        region("reg-03", "Ege Bölgesi", "Western Anatolia trade and industry network"),
        region("reg-04", "Akdeniz Bölgesi", "Southern provinces, tourism and agriculture"),
        region("reg-05", "Karadeniz Bölgesi", "Northern provinces, logistics and trade line"),
        region("reg-06", "Güneydoğu Anadolu", "Industry and trade around Gaziantep"),
        region("reg-07", "Doğu Anadolu", "Coordination of the eastern provinces"),
    ]
}

fn chamber(id: &str, name: &str, city: &str, region_id: &str, members: u32, delegates: u32) -> Chamber {
    Chamber {
        id: id.to_string(),
        name: name.to_string(),
        city: city.to_string(),
        region_id: Some(region_id.to_string()),
        total_members: members,
        total_delegates: delegates,
        voted_delegates_count: 0,
    }
}

pub fn chambers() -> Vec<Chamber> {
    vec![
        // Marmara
        chamber("ch-s39", "İSTANBUL SMMMO", "İstanbul", "reg-01", 52400, 168),
        chamber("ch-s19", "BURSA SMMMO", "Bursa", "reg-01", 6450, 52),
        chamber("ch-s50", "KOCAELİ SMMMO", "Kocaeli", "reg-01", 2200, 18),
        chamber("ch-s11", "BALIKESİR SMMMO", "Balıkesir", "reg-01", 1450, 12),
        chamber("ch-s70", "TEKİRDAĞ SMMMO", "Tekirdağ", "reg-01", 1200, 10),
        chamber("ch-s65", "SAKARYA SMMMO", "Sakarya", "reg-01", 1350, 11),
        chamber("ch-s20", "ÇANAKKALE SMMMO", "Çanakkale", "reg-01", 950, 8),
        // Central Anatolia
        chamber("ch-s7", "ANKARA SMMMO", "Ankara", "reg-02", 17200, 88),
        chamber("ch-s51", "KONYA SMMMO", "Konya", "reg-02", 3100, 26),
        chamber("ch-s31", "ESKİŞEHİR SMMMO", "Eskişehir", "reg-02", 1250, 10),
        chamber("ch-s66", "SAMSUN SMMMO", "Samsun", "reg-05", 1650, 14),
        chamber("ch-s46", "KAYSERİ SMMMO", "Kayseri", "reg-02", 1950, 16),
        chamber("ch-s68", "SİVAS SMMMO", "Sivas", "reg-02", 750, 6),
        // Aegean
        chamber("ch-s40", "İZMİR SMMMO", "İzmir", "reg-03", 11200, 68),
        chamber("ch-s24", "DENİZLİ SMMMO", "Denizli", "reg-03", 1600, 14),
        chamber("ch-s10", "AYDIN SMMMO", "Aydın", "reg-03", 1550, 13),
        chamber("ch-s55", "MANİSA SMMMO", "Manisa", "reg-03", 1450, 12),
        chamber("ch-s58", "MUĞLA SMMMO", "Muğla", "reg-03", 1300, 11),
        // Mediterranean
        chamber("ch-s8", "ANTALYA SMMMO", "Antalya", "reg-04", 5200, 42),
        chamber("ch-s1", "ADANA SMMMO", "Adana", "reg-04", 3950, 32),
        chamber("ch-s57", "MERSİN SMMMO", "Mersin", "reg-04", 2150, 18),
        chamber("ch-s36", "HATAY SMMMO", "Hatay", "reg-04", 1150, 9),
        chamber("ch-s41", "KAHRAMANMARAŞ SMMMO", "K.Maraş", "reg-04", 980, 8),
        // South-east
        chamber("ch-s33", "GAZİANTEP SMMMO", "Gaziantep", "reg-06", 2350, 20),
        chamber("ch-s25", "DİYARBAKIR SMMMO", "Diyarbakır", "reg-06", 1200, 10),
        chamber("ch-s69", "ŞANLIURFA SMMMO", "Şanlıurfa", "reg-06", 1050, 9),
        // Sworn accountant chambers
        chamber("ch-y7", "İSTANBUL YMMO", "İstanbul", "reg-01", 2400, 22),
        chamber("ch-y2", "ANKARA YMMO", "Ankara", "reg-02", 1200, 10),
        chamber("ch-y8", "İZMİR YMMO", "İzmir", "reg-03", 850, 7),
    ]
}

fn user(id: &str, name: &str, email: &str, role: UserRole, scope: Scope) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        scope,
        is_active: true,
    }
}

pub fn users() -> Vec<User> {
    vec![
        user(
            "u-1",
            "TÜMDEP Genel Merkez",
            "admin@tumdep.org",
            UserRole::Admin,
            Scope::Global,
        ),
        user(
            "u-2",
            "Marmara Bölge Sorumlusu",
            "marmara@tumdep.org",
            UserRole::Strategy,
            Scope::Region("reg-01".to_string()),
        ),
        user(
            "u-3",
            "Ankara Saha Sorumlusu",
            "ankara@tumdep.org",
            UserRole::Manager,
            Scope::Region("reg-02".to_string()),
        ),
    ]
}

fn period(id: &str, year: i32, label: &str, is_active: bool, total_delegates: u32) -> ElectionPeriod {
    ElectionPeriod {
        id: id.to_string(),
        year,
        label: label.to_string(),
        is_active,
        total_delegates,
    }
}

pub fn periods() -> Vec<ElectionPeriod> {
    vec![
        period("ep-20", 2020, "2020 Olağan Genel Kurul", false, 420),
        period("ep-24", 2024, "2024 Olağan Genel Kurul", false, 435),
        period("ep-28", 2028, "2028 Stratejik Hedef Seçimleri", true, TARGET_VOTES),
    ]
}

fn faction(id: &str, name: &str, description: &str, color: &str, main: bool) -> Faction {
    Faction {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        color: color.to_string(),
        is_main_competitor: main,
    }
}

pub fn factions() -> Vec<Faction> {
    vec![
        faction("f-01", "TÜMDEP", "Our own group", "#3b82f6", false),
        faction("f-02", "Çağdaş Grubu", "Traditional opposition", "#ef4444", true),
        faction("f-03", "Bağımsızlar", "Delegates without a group", "#94a3b8", false),
        faction("f-04", "Meslekte Birlik", "Rising alternative list", "#10b981", false),
    ]
}

pub fn results() -> Vec<ElectionResult> {
    vec![
        ElectionResult {
            id: "res-1".to_string(),
            period_id: "ep-24".to_string(),
            year: 2024,
            chamber_id: "ch-s39".to_string(),
            faction_id: "f-01".to_string(),
            votes: 72,
        },
        ElectionResult {
            id: "res-2".to_string(),
            period_id: "ep-24".to_string(),
            year: 2024,
            chamber_id: "ch-s39".to_string(),
            faction_id: "f-02".to_string(),
            votes: 90,
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn delegate(
    id: &str,
    name: &str,
    chamber_id: &str,
    status: VoteStatus,
    (year, month, day): (i32, u32, u32),
    manager: &str,
    notes: &str,
    risk_score: f64,
    groups: (&str, &str),
    tendency: &str,
) -> Delegate {
    Delegate {
        id: id.to_string(),
        name: name.to_string(),
        chamber_id: chamber_id.to_string(),
        status,
        last_contact_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        assigned_manager: manager.to_string(),
        notes: notes.to_string(),
        risk_score,
        current_group: groups.0.to_string(),
        previous_group: Some(groups.1.to_string()),
        tendency: tendency.to_string(),
        election_year: 2028,
    }
}

pub fn delegates() -> Vec<Delegate> {
    vec![
        delegate(
            "1",
            "Mehmet Özdemir",
            "ch-s39",
            VoteStatus::Certain,
            (2025, 5, 10),
            "Ali Bey",
            "Steady.",
            5.0,
            ("f-01", "f-01"),
            "TÜMDEP Sadık",
        ),
        delegate(
            "2",
            "Ahmet Yılmaz",
            "ch-s39",
            VoteStatus::Undecided,
            (2025, 5, 12),
            "Caner Bey",
            "Undecided, waiting for a meeting.",
            45.0,
            ("f-03", "f-02"),
            "TÜMDEP Yakın",
        ),
        delegate(
            "3",
            "Selin Aksoy",
            "ch-s7",
            VoteStatus::Risky,
            (2025, 4, 20),
            "Veli Bey",
            "Contacted by the rival group.",
            75.0,
            ("f-02", "f-02"),
            "Rakibe Kayabilir",
        ),
    ]
}
