use serde::Serialize;
use std::collections::BTreeMap;

/// Static option tables for the input form. The tables never restrict what a
/// request may carry; the form controller only uses them to populate selects
/// and to pre-fill the teacher name from the chosen class.
pub const SUBJECTS: [&str; 10] = [
    "Al-Qur'an Hadits",
    "Akidah Akhlak",
    "Fikih",
    "Sejarah Kebudayaan Islam",
    "Bahasa Arab",
    "Tematik (Umum)",
    "Matematika",
    "PJOK",
    "Seni Budaya",
    "Bahasa Inggris",
];

pub const CLASS_PHASES: [&str; 6] = [
    "Fase A / Kelas 1",
    "Fase A / Kelas 2",
    "Fase B / Kelas 3",
    "Fase B / Kelas 4",
    "Fase C / Kelas 5",
    "Fase C / Kelas 6",
];

/// Tema Kurikulum Berbasis Cinta.
pub const VALUE_THEMES: [&str; 5] = [
    "Cinta Allah dan Rasul-Nya",
    "Cinta Ilmu",
    "Cinta Lingkungan",
    "Cinta Diri dan Sesama",
    "Cinta Tanah Air",
];

/// Learning models with the one-line description shown under the select.
pub const LEARNING_MODELS: [(&str, &str); 29] = [
    (
        "Problem Based Learning (PBL)",
        "Model pembelajaran berbasis masalah nyata yang melatih kemampuan berpikir kritis dan pemecahan masalah.",
    ),
    (
        "Project Based Learning (PjBL)",
        "Pembelajaran berbasis proyek melalui proses eksplorasi, penilaian, sintesis, dan pembuatan produk.",
    ),
    (
        "Discovery Learning",
        "Peserta didik menemukan sendiri konsep melalui observasi, analisis, dan proses ilmiah sederhana.",
    ),
    (
        "Inquiry Learning",
        "Menekankan proses berpikir kritis dan analitis untuk menemukan jawaban atas suatu permasalahan.",
    ),
    (
        "Cooperative Learning",
        "Belajar dalam kelompok kecil dengan kemampuan beragam untuk mencapai tujuan bersama.",
    ),
    (
        "Contextual Teaching and Learning (CTL)",
        "Pembelajaran yang menghubungkan materi dengan konteks dunia nyata peserta didik.",
    ),
    (
        "Flipped Classroom",
        "Model pembelajaran di mana materi dipelajari di rumah, sedangkan kegiatan praktik, diskusi, dan pendalaman dilakukan di kelas.",
    ),
    (
        "Blended Learning",
        "Perpaduan pembelajaran tatap muka dan online untuk meningkatkan fleksibilitas belajar.",
    ),
    (
        "STEM/STEAM Learning",
        "Pembelajaran yang mengintegrasikan sains, teknologi, rekayasa, seni (opsional), dan matematika dalam pemecahan masalah nyata.",
    ),
    (
        "Problem Solving Learning",
        "Model yang berfokus pada keterampilan memecahkan masalah melalui tahapan identifikasi, analisis, dan evaluasi.",
    ),
    (
        "Direct Instruction",
        "Pembelajaran langsung melalui penjelasan guru secara sistematis dan terstruktur.",
    ),
    (
        "Differentiated Instruction",
        "Pembelajaran yang disesuaikan dengan kebutuhan, kemampuan, minat, dan gaya belajar peserta didik.",
    ),
    (
        "Sociocultural / Inquiry Sosial",
        "Pembelajaran berbasis interaksi sosial dan kolaborasi, mengacu pada teori Vygotsky.",
    ),
    (
        "Experiential Learning",
        "Belajar melalui pengalaman langsung, refleksi, konsep, dan penerapan (Kolb).",
    ),
    (
        "Humanistic Learning",
        "Model yang menekankan perkembangan kepribadian, motivasi internal, dan kebutuhan emosional peserta didik.",
    ),
    (
        "Quantum Learning",
        "Model pembelajaran yang menggabungkan interaksi, strategi belajar menyenangkan, dan lingkungan positif untuk memaksimalkan proses belajar.",
    ),
    (
        "Quantum Teaching",
        "Pendekatan mengajar yang menekankan orkestrasi lingkungan belajar, bahasa tubuh, dan strategi komunikasi untuk memudahkan pemahaman.",
    ),
    (
        "Saintifik 5M",
        "Model Kurikulum 2013: Mengamati, Menanya, Mengumpulkan Informasi, Menalar, Mengomunikasikan (5M).",
    ),
    (
        "Student Centered Learning (SCL)",
        "Pembelajaran yang berpusat pada peserta didik, menekankan aktivitas, kreativitas, dan kemandirian siswa.",
    ),
    (
        "Problem Posing",
        "Model yang melibatkan peserta didik dalam membuat atau merumuskan soal sebelum menyelesaikannya.",
    ),
    (
        "Role Playing / Simulation",
        "Peserta didik belajar melalui permainan peran untuk memahami situasi, konsep sosial, atau masalah tertentu.",
    ),
    (
        "Mastery Learning",
        "Peserta didik harus mencapai tingkat penguasaan tertentu sebelum melanjutkan ke materi berikutnya.",
    ),
    (
        "Literacy-Based Learning",
        "Pembelajaran berbasis literasi yang menekankan kemampuan memahami teks, informasi, dan konteks secara kritis.",
    ),
    (
        "Numeracy-Based Learning",
        "Pembelajaran berbasis numerasi yang menekankan kemampuan menghitung, menganalisis angka, dan memecahkan masalah matematis.",
    ),
    (
        "Service Learning",
        "Pembelajaran yang menggabungkan kegiatan sosial/layanan masyarakat dengan refleksi sebagai bagian dari proses belajar.",
    ),
    (
        "Game-Based Learning",
        "Pembelajaran yang menggunakan mekanisme permainan untuk meningkatkan motivasi, keterlibatan, dan pemahaman.",
    ),
    (
        "Adaptive Learning",
        "Model pembelajaran yang menyesuaikan materi, kecepatan, dan strategi berdasarkan kemampuan masing-masing peserta didik.",
    ),
    (
        "Collaborative Learning",
        "Pembelajaran yang menekankan kerja sama kelompok dalam memecahkan masalah atau menghasilkan produk.",
    ),
    (
        "Holistic Learning",
        "Pendekatan yang melihat peserta didik secara utuh: kognitif, emosional, sosial, fisik, dan spiritual.",
    ),
];

pub const TEACHERS: [&str; 9] = [
    "AHMAD HUSSAINI, S.Pd.I",
    "GUSTI RAHAYU, S.Pd.I",
    "HIKMATUN FITRIAH, S.Pd",
    "TAHMIDULLAH, S.Pd",
    "JUNI WARDANI, S.Pd",
    "TAZKIRATUN NUFUS, S.Pd",
    "FASHIHAH DIANAH, S.Pd",
    "GT. HAIRUNNISA, S.Pd",
    "NUR SAIDAH, S.Pd.I",
];

/// Homeroom teacher per class, used only to pre-fill the teacher select.
pub const CLASS_TEACHERS: [(&str, &str); 6] = [
    ("Fase A / Kelas 1", "GUSTI RAHAYU, S.Pd.I"),
    ("Fase A / Kelas 2", "HIKMATUN FITRIAH, S.Pd"),
    ("Fase B / Kelas 3", "TAHMIDULLAH, S.Pd"),
    ("Fase B / Kelas 4", "JUNI WARDANI, S.Pd"),
    ("Fase C / Kelas 5", "TAZKIRATUN NUFUS, S.Pd"),
    ("Fase C / Kelas 6", "FASHIHAH DIANAH, S.Pd"),
];

pub const DEFAULT_LEARNING_MODEL: &str = "Problem Based Learning (PBL)";
pub const DEFAULT_TIME_ALLOCATION: &str = "2 x 35 Menit";

pub fn teacher_for_class(class_phase: &str) -> Option<&'static str> {
    CLASS_TEACHERS
        .iter()
        .find(|(class, _)| *class == class_phase)
        .map(|(_, teacher)| *teacher)
}

pub fn model_description(model: &str) -> Option<&'static str> {
    LEARNING_MODELS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, description)| *description)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelOption {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDefaults {
    pub learning_model: &'static str,
    pub time_allocation: &'static str,
}

/// Everything the input form needs, in one payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub subjects: Vec<&'static str>,
    pub class_phases: Vec<&'static str>,
    pub value_themes: Vec<&'static str>,
    pub learning_models: Vec<ModelOption>,
    pub teachers: Vec<&'static str>,
    pub class_teachers: BTreeMap<&'static str, &'static str>,
    pub defaults: CatalogDefaults,
}

impl Catalog {
    pub fn current() -> Self {
        Catalog {
            subjects: SUBJECTS.to_vec(),
            class_phases: CLASS_PHASES.to_vec(),
            value_themes: VALUE_THEMES.to_vec(),
            learning_models: LEARNING_MODELS
                .iter()
                .map(|(name, description)| ModelOption { name, description })
                .collect(),
            teachers: TEACHERS.to_vec(),
            class_teachers: CLASS_TEACHERS.iter().copied().collect(),
            defaults: CatalogDefaults {
                learning_model: DEFAULT_LEARNING_MODEL,
                time_allocation: DEFAULT_TIME_ALLOCATION,
            },
        }
    }
}
